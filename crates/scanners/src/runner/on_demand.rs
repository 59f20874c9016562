use crate::core::{EngineError, Issue, ScannerClass};
use crate::document::Document;
use crate::runner::engine::ExecutionOrchestrator;
use crate::runner::registry::ScannerRegistry;
use std::sync::Arc;
use tracing::info;

/// What to run on demand: a registered id or a class handed in directly.
#[derive(Debug, Clone)]
pub enum ScannerRef {
    Id(String),
    Class(ScannerClass),
}

impl From<&str> for ScannerRef {
    fn from(id: &str) -> Self {
        Self::Id(id.to_string())
    }
}

impl From<String> for ScannerRef {
    fn from(id: String) -> Self {
        Self::Id(id)
    }
}

impl From<ScannerClass> for ScannerRef {
    fn from(class: ScannerClass) -> Self {
        Self::Class(class)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OnDemandOptions {
    /// Replace the displayed issues with this run's results.
    pub apply_results: bool,
}

impl OnDemandOptions {
    pub fn applying() -> Self {
        Self {
            apply_results: true,
        }
    }
}

/// Resolves and runs a single scanner outside the auto-run cycle.
pub struct OnDemandRunner<'a> {
    orchestrator: &'a ExecutionOrchestrator,
    registry: &'a ScannerRegistry,
}

impl<'a> OnDemandRunner<'a> {
    pub fn new(orchestrator: &'a ExecutionOrchestrator, registry: &'a ScannerRegistry) -> Self {
        Self {
            orchestrator,
            registry,
        }
    }

    /// Configured scanners win over registry entries with the same id.
    pub fn resolve(&self, scanner: ScannerRef) -> Result<ScannerClass, EngineError> {
        match scanner {
            ScannerRef::Class(class) => Ok(class),
            ScannerRef::Id(id) => match self.orchestrator.find(&id) {
                Some(class) => Ok(class.clone()),
                None => self.registry.resolve(&id),
            },
        }
    }

    pub async fn run(
        &self,
        scanner: ScannerRef,
        document: Arc<Document>,
    ) -> Result<Vec<Issue>, EngineError> {
        let class = self.resolve(scanner)?;
        info!(scanner = class.id(), "Running scanner on demand");
        ExecutionOrchestrator::execute(&class, document).await
    }
}
