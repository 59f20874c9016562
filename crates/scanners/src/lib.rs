//! inkcheck - Document Annotation Engine
//!
//! Runs pluggable scanners over a structured rich-text document, maps what
//! they find back onto exact document positions, and keeps an overlay of
//! issue markers in step with live edits.

pub mod annotation;
pub mod config;
pub mod core;
pub mod document;
pub mod engine;
pub mod llm;
pub mod rules;
pub mod runner;

pub use annotation::{AnnotationState, IgnoreEntry, IgnoreList, Overlay, OverlayVersion};
pub use config::{ConfigError, EngineConfig, ScannerSpec};
pub use core::{
    AsyncScanner, CustomSeverity, EngineError, FixOperation, Issue, IssueRecorder, Scanner,
    ScannerClass, Severity, SeverityTable,
};
pub use document::{Document, Node, PositionMap, TextRange, TextSegment};
pub use engine::{AnnotationEngine, AnnotationEngineBuilder, Mutation, MutationOutcome};
pub use llm::{AnalysisProvider, MockAnalysisProvider, NaturalLanguageScannerFactory};
pub use runner::{
    ExecutionOrchestrator, OnDemandOptions, RunMode, ScanReport, ScannerDescriptor, ScannerRef,
    ScannerRegistry,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
