//! Core abstractions shared by every other module
//!
//! The issue record and its recorder, the severity model with custom
//! severities, the two-variant scanner contract, and the typed errors the
//! engine surfaces to callers.

pub mod error;
pub mod issue;
pub mod scanner;
pub mod severity;

pub use error::EngineError;
pub use issue::{FixOperation, Issue, IssueKey, IssueRecorder};
pub use scanner::{AsyncScanner, ExecutionMode, Scanner, ScannerClass, ScannerInstance};
pub use severity::{CustomSeverity, Severity, SeverityTable};
