use crate::core::error::panic_message;
use crate::core::{
    AsyncScanner, EngineError, ExecutionMode, Issue, Scanner, ScannerClass, ScannerInstance,
};
use crate::document::Document;
use crate::runner::descriptor::{RunMode, ScannerDescriptor, ScannerEntry};
use futures_util::future::join_all;
use futures_util::FutureExt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs the configured auto scanners against a document snapshot and merges
/// what they report.
///
/// Synchronous scanners run first, one after another, in configuration
/// order. Asynchronous scanners are then driven concurrently. The merged list
/// always holds the synchronous issues first and then the asynchronous ones,
/// each group in configuration order, regardless of completion order. A
/// scanner that errors or panics is logged and contributes nothing.
#[derive(Debug, Clone, Default)]
pub struct ExecutionOrchestrator {
    descriptors: Vec<ScannerDescriptor>,
    auto_sync: Vec<ScannerClass>,
    auto_async: Vec<ScannerClass>,
}

impl ExecutionOrchestrator {
    pub fn new<I, E>(entries: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<ScannerEntry>,
    {
        let descriptors = entries
            .into_iter()
            .map(|entry| ScannerDescriptor::from(entry.into()))
            .collect();
        Self::from_descriptors(descriptors)
    }

    pub fn from_descriptors(descriptors: Vec<ScannerDescriptor>) -> Self {
        let mut auto_sync = Vec::new();
        let mut auto_async = Vec::new();
        for descriptor in descriptors.iter().filter(|d| d.run_mode == RunMode::Auto) {
            match descriptor.class.mode() {
                ExecutionMode::Sync => auto_sync.push(descriptor.class.clone()),
                ExecutionMode::Async => auto_async.push(descriptor.class.clone()),
            }
        }
        Self {
            descriptors,
            auto_sync,
            auto_async,
        }
    }

    pub fn add_scanner(mut self, entry: impl Into<ScannerEntry>) -> Self {
        let descriptor = ScannerDescriptor::from(entry.into());
        if descriptor.is_auto() {
            match descriptor.class.mode() {
                ExecutionMode::Sync => self.auto_sync.push(descriptor.class.clone()),
                ExecutionMode::Async => self.auto_async.push(descriptor.class.clone()),
            }
        }
        self.descriptors.push(descriptor);
        self
    }

    pub fn descriptors(&self) -> &[ScannerDescriptor] {
        &self.descriptors
    }

    /// A configured scanner by id, whatever its run mode.
    pub fn find(&self, id: &str) -> Option<&ScannerClass> {
        self.descriptors
            .iter()
            .find(|d| d.id() == id)
            .map(|d| &d.class)
    }

    pub fn list_scanners(&self) -> Vec<ScannerInfo> {
        self.descriptors
            .iter()
            .map(|d| ScannerInfo {
                id: d.id().to_string(),
                description: d.class.description().to_string(),
                mode: d.class.mode(),
                run_mode: d.run_mode,
            })
            .collect()
    }

    pub async fn run_auto(&self, document: Arc<Document>) -> Vec<Issue> {
        let doc_size = document.content_size();
        let mut merged = Vec::new();

        for class in &self.auto_sync {
            match run_sync(class, document.clone()) {
                Ok(issues) => merged.extend(issues),
                Err(e) => warn!(scanner = class.id(), "Scanner failed: {e:#}"),
            }
        }

        let pending = self
            .auto_async
            .iter()
            .map(|class| run_async(class, document.clone()));
        let outcomes = join_all(pending).await;

        for (class, outcome) in self.auto_async.iter().zip(outcomes) {
            match outcome {
                Ok(issues) => merged.extend(issues),
                Err(e) => warn!(scanner = class.id(), "Scanner failed: {e:#}"),
            }
        }

        retain_valid(merged, doc_size)
    }

    /// Run one scanner of either variant. Failures are returned, not logged.
    pub async fn execute(
        class: &ScannerClass,
        document: Arc<Document>,
    ) -> Result<Vec<Issue>, EngineError> {
        let doc_size = document.content_size();
        let issues = match class.mode() {
            ExecutionMode::Sync => run_sync(class, document)?,
            ExecutionMode::Async => run_async(class, document).await?,
        };
        Ok(retain_valid(issues, doc_size))
    }
}

#[derive(Debug, Clone)]
pub struct ScannerInfo {
    pub id: String,
    pub description: String,
    pub mode: ExecutionMode,
    pub run_mode: RunMode,
}

fn instantiate(class: &ScannerClass, document: Arc<Document>) -> Result<ScannerInstance, EngineError> {
    panic::catch_unwind(AssertUnwindSafe(|| class.instantiate(document))).unwrap_or_else(
        |payload| {
            Err(EngineError::InvalidScanner(format!(
                "'{}' panicked during construction: {}",
                class.id(),
                panic_message(&*payload)
            )))
        },
    )
}

fn run_sync(class: &ScannerClass, document: Arc<Document>) -> Result<Vec<Issue>, EngineError> {
    match instantiate(class, document)? {
        ScannerInstance::Sync(scanner) => drive_sync(class.id(), scanner),
        ScannerInstance::Async(_) => Err(EngineError::InvalidScanner(format!(
            "'{}' produced an async instance in the sync phase",
            class.id()
        ))),
    }
}

async fn run_async(class: &ScannerClass, document: Arc<Document>) -> Result<Vec<Issue>, EngineError> {
    match instantiate(class, document)? {
        ScannerInstance::Async(scanner) => drive_async(class.id(), scanner).await,
        ScannerInstance::Sync(scanner) => drive_sync(class.id(), scanner),
    }
}

fn drive_sync(id: &str, mut scanner: Box<dyn Scanner>) -> Result<Vec<Issue>, EngineError> {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        scanner.scan()?;
        Ok::<_, anyhow::Error>(scanner.results().to_vec())
    }));
    settle(id, outcome)
}

async fn drive_async(id: &str, mut scanner: Box<dyn AsyncScanner>) -> Result<Vec<Issue>, EngineError> {
    let outcome = AssertUnwindSafe(async move {
        scanner.scan().await?;
        Ok::<_, anyhow::Error>(scanner.results().to_vec())
    })
    .catch_unwind()
    .await;
    settle(id, outcome)
}

fn settle(
    id: &str,
    outcome: std::thread::Result<anyhow::Result<Vec<Issue>>>,
) -> Result<Vec<Issue>, EngineError> {
    match outcome {
        Ok(Ok(issues)) => {
            debug!(scanner = id, count = issues.len(), "Scanner finished");
            Ok(issues)
        }
        Ok(Err(source)) => Err(EngineError::ScannerFailed {
            scanner: id.to_string(),
            source,
        }),
        Err(payload) => Err(EngineError::ScannerPanicked {
            scanner: id.to_string(),
            message: panic_message(&*payload),
        }),
    }
}

fn retain_valid(issues: Vec<Issue>, doc_size: usize) -> Vec<Issue> {
    issues
        .into_iter()
        .filter(|issue| {
            let valid = issue.has_valid_range(doc_size);
            if !valid {
                debug!(
                    from = issue.from,
                    to = issue.to,
                    doc_size,
                    "Dropping issue outside the document"
                );
            }
            valid
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IssueRecorder;
    use crate::rules::{BadWordsScanner, HeadingLevelScanner};
    use async_trait::async_trait;

    struct Fixed {
        issues: Vec<Issue>,
        recorder: IssueRecorder,
    }

    impl Fixed {
        fn class(id: &'static str, issues: Vec<Issue>) -> ScannerClass {
            ScannerClass::sync(id, move |_doc| Fixed {
                issues: issues.clone(),
                recorder: IssueRecorder::new(),
            })
        }

        fn scan_impl(&mut self) -> anyhow::Result<()> {
            for issue in &self.issues {
                self.recorder.push(issue.clone());
            }
            Ok(())
        }
    }

    crate::impl_scanner!(Fixed);

    struct Exploding;

    impl Scanner for Exploding {
        fn scan(&mut self) -> anyhow::Result<()> {
            panic!("boom");
        }

        fn results(&self) -> &[Issue] {
            &[]
        }
    }

    struct Failing;

    #[async_trait]
    impl AsyncScanner for Failing {
        async fn scan(&mut self) -> anyhow::Result<()> {
            anyhow::bail!("provider unavailable")
        }

        fn results(&self) -> &[Issue] {
            &[]
        }
    }

    fn doc() -> Arc<Document> {
        Arc::new(Document::from_paragraphs(&["This is obviously fine."]))
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let orchestrator = ExecutionOrchestrator::new(vec![
            ScannerClass::sync("exploding", |_doc| Exploding),
            BadWordsScanner::class(),
            ScannerClass::asynchronous("failing", |_doc| Failing),
        ]);

        let issues = orchestrator.run_auto(doc()).await;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "Avoid 'obviously'");
    }

    #[tokio::test]
    async fn test_on_demand_descriptors_are_skipped() {
        let orchestrator = ExecutionOrchestrator::default()
            .add_scanner((BadWordsScanner::class(), RunMode::OnDemand))
            .add_scanner(HeadingLevelScanner::class());

        assert!(orchestrator.run_auto(doc()).await.is_empty());
        assert!(orchestrator.find("bad-words").is_some());
        assert_eq!(orchestrator.list_scanners().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_geometry_is_dropped() {
        let orchestrator = ExecutionOrchestrator::new(vec![Fixed::class(
            "fixed",
            vec![
                Issue::new("negative", -1, 3),
                Issue::new("empty", 4, 4),
                Issue::new("past end", 2, 500),
                Issue::new("kept", 1, 5),
            ],
        )]);

        let issues = orchestrator.run_auto(doc()).await;
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "kept");
    }

    #[tokio::test]
    async fn test_execute_surfaces_errors() {
        let failing = ScannerClass::asynchronous("failing", |_doc| Failing);
        let err = ExecutionOrchestrator::execute(&failing, doc()).await.unwrap_err();
        assert!(matches!(err, EngineError::ScannerFailed { ref scanner, .. } if scanner == "failing"));

        let exploding = ScannerClass::sync("exploding", |_doc| Exploding);
        let err = ExecutionOrchestrator::execute(&exploding, doc()).await.unwrap_err();
        match err {
            EngineError::ScannerPanicked { message, .. } => assert_eq!(message, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_failing_constructor_is_invalid() {
        let class = ScannerClass::try_sync("broken", |_doc| -> anyhow::Result<Exploding> {
            anyhow::bail!("missing word list")
        });
        let err = ExecutionOrchestrator::execute(&class, doc()).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidScanner(_)));
    }
}
