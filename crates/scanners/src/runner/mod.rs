//! Scanner execution
//!
//! Descriptors normalize the configured scanner list, the orchestrator runs
//! the auto scanners against a snapshot, and the on-demand runner executes a
//! single scanner by id or class. The registry maps ids to classes so new
//! scanners can be added without touching the execution path.

pub mod descriptor;
pub mod engine;
pub mod on_demand;
pub mod registry;
pub mod report;

pub use descriptor::{RunMode, ScannerDescriptor, ScannerEntry};
pub use engine::{ExecutionOrchestrator, ScannerInfo};
pub use on_demand::{OnDemandOptions, OnDemandRunner, ScannerRef};
pub use registry::{ScannerRegistry, ScannerRegistryBuilder};
pub use report::{ScanReport, SeverityCount};
