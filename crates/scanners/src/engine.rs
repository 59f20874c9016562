//! Host-facing engine.
//!
//! [`AnnotationEngine`] receives mutation notifications, runs the auto
//! scanners when content changed, and installs the results in the shared
//! [`AnnotationState`]. The state lock is only taken between suspension
//! points, never across one.

use crate::annotation::{AnnotationState, ApplyOutcome, IgnoreList, Overlay, OverlayVersion};
use crate::config::{ConfigError, EngineConfig};
use crate::core::{CustomSeverity, EngineError, Issue, SeverityTable};
use crate::document::Document;
use crate::llm::AnalysisProvider;
use crate::runner::{
    ExecutionOrchestrator, OnDemandOptions, OnDemandRunner, ScannerEntry, ScannerRef,
    ScannerRegistry,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

/// A document change as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mutation {
    pub content_changed: bool,
}

impl Mutation {
    pub fn content() -> Self {
        Self {
            content_changed: true,
        }
    }

    /// Selection moves and other changes that leave the text alone.
    pub fn selection() -> Self {
        Self {
            content_changed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Auto-run is off; nothing was scheduled.
    Disabled,
    Reused(OverlayVersion),
    Rebuilt(OverlayVersion),
    /// A newer recomputation started before this one finished.
    Stale,
}

pub struct AnnotationEngine {
    orchestrator: ExecutionOrchestrator,
    registry: ScannerRegistry,
    state: Arc<Mutex<AnnotationState>>,
    auto_run: bool,
}

impl AnnotationEngine {
    pub fn new(
        orchestrator: ExecutionOrchestrator,
        registry: ScannerRegistry,
        state: Arc<Mutex<AnnotationState>>,
    ) -> Self {
        Self {
            orchestrator,
            registry,
            state,
            auto_run: true,
        }
    }

    pub fn builder() -> AnnotationEngineBuilder {
        AnnotationEngineBuilder::new()
    }

    /// Register natural-language rules into `registry`, resolve the scanner
    /// list, and build an engine with the configured severities.
    pub fn from_config(
        config: &EngineConfig,
        mut registry: ScannerRegistry,
        provider: Option<Arc<dyn AnalysisProvider>>,
    ) -> Result<Self, ConfigError> {
        config.register_natural_language(&mut registry, provider)?;
        let descriptors = config.resolve(&registry)?;
        let state = AnnotationState::new(config.severity_table());

        Ok(Self::new(
            ExecutionOrchestrator::from_descriptors(descriptors),
            registry,
            Arc::new(Mutex::new(state)),
        )
        .with_auto_run(config.auto_run))
    }

    pub fn with_auto_run(mut self, auto_run: bool) -> Self {
        self.auto_run = auto_run;
        self
    }

    pub fn auto_run(&self) -> bool {
        self.auto_run
    }

    pub fn orchestrator(&self) -> &ExecutionOrchestrator {
        &self.orchestrator
    }

    pub fn registry(&self) -> &ScannerRegistry {
        &self.registry
    }

    /// Shared handle to the annotation state.
    pub fn state(&self) -> Arc<Mutex<AnnotationState>> {
        self.state.clone()
    }

    pub fn issues(&self) -> Vec<Issue> {
        self.state.lock().issues().to_vec()
    }

    pub fn overlay(&self) -> Overlay {
        self.state.lock().overlay().clone()
    }

    pub fn overlay_version(&self) -> OverlayVersion {
        self.state.lock().overlay_version()
    }

    pub fn ignore_list(&self) -> IgnoreList {
        self.state.lock().ignore_list().clone()
    }

    /// First computation for a freshly loaded document.
    pub async fn initialize(&self, document: Arc<Document>) -> MutationOutcome {
        self.handle_mutation(document, Mutation::content()).await
    }

    pub async fn handle_mutation(
        &self,
        document: Arc<Document>,
        mutation: Mutation,
    ) -> MutationOutcome {
        if !self.auto_run {
            return MutationOutcome::Disabled;
        }

        if !mutation.content_changed {
            let version = self.state.lock().overlay_version();
            debug!(%version, "Content unchanged, reusing overlay");
            return MutationOutcome::Reused(version);
        }

        let generation = self.state.lock().begin_recompute();
        let issues = self.orchestrator.run_auto(document).await;
        let count = issues.len();
        let applied = self.state.lock().apply(generation, issues);

        match applied {
            ApplyOutcome::Applied(version) => {
                info!(%version, issues = count, "Overlay rebuilt");
                MutationOutcome::Rebuilt(version)
            }
            ApplyOutcome::Stale => MutationOutcome::Stale,
        }
    }

    pub fn dismiss(&self, issue: &Issue) -> OverlayVersion {
        self.state.lock().dismiss(issue)
    }

    pub fn clear_ignored(&self) -> OverlayVersion {
        self.state.lock().clear_ignored()
    }

    pub fn load_ignore_list(&self, ignore: IgnoreList) -> OverlayVersion {
        self.state.lock().set_ignore_list(ignore)
    }

    /// Run exactly one scanner, whatever its run mode. The global issues and
    /// overlay are untouched unless `options.apply_results` is set, in which
    /// case they are replaced by this run's issues.
    pub async fn run_on_demand(
        &self,
        scanner: impl Into<ScannerRef>,
        document: Arc<Document>,
        options: OnDemandOptions,
    ) -> Result<Vec<Issue>, EngineError> {
        let runner = OnDemandRunner::new(&self.orchestrator, &self.registry);
        let issues = runner.run(scanner.into(), document).await?;

        if options.apply_results {
            let version = self.state.lock().replace_issues(issues.clone());
            info!(%version, issues = issues.len(), "Applied on-demand results");
        }
        Ok(issues)
    }
}

pub struct AnnotationEngineBuilder {
    scanners: Vec<ScannerEntry>,
    registry: Option<ScannerRegistry>,
    state: Option<Arc<Mutex<AnnotationState>>>,
    custom_severities: Vec<CustomSeverity>,
    auto_run: bool,
}

impl AnnotationEngineBuilder {
    pub fn new() -> Self {
        Self {
            scanners: Vec::new(),
            registry: None,
            state: None,
            custom_severities: Vec::new(),
            auto_run: true,
        }
    }

    pub fn with_scanner(mut self, entry: impl Into<ScannerEntry>) -> Self {
        self.scanners.push(entry.into());
        self
    }

    pub fn with_registry(mut self, registry: ScannerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Use an existing state object. Custom severities given to the builder
    /// are ignored in that case.
    pub fn with_state(mut self, state: Arc<Mutex<AnnotationState>>) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_custom_severity(mut self, severity: CustomSeverity) -> Self {
        self.custom_severities.push(severity);
        self
    }

    pub fn auto_run(mut self, auto_run: bool) -> Self {
        self.auto_run = auto_run;
        self
    }

    pub fn build(self) -> AnnotationEngine {
        let severities = SeverityTable::new(&self.custom_severities);
        let state = self
            .state
            .unwrap_or_else(|| Arc::new(Mutex::new(AnnotationState::new(severities))));

        AnnotationEngine::new(
            ExecutionOrchestrator::new(self.scanners),
            self.registry.unwrap_or_else(ScannerRegistry::with_builtins),
            state,
        )
        .with_auto_run(self.auto_run)
    }
}

impl Default for AnnotationEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}
