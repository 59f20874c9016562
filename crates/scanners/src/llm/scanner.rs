use crate::core::error::panic_message;
use crate::core::{AsyncScanner, FixOperation, Issue, IssueRecorder, Severity};
use crate::document::Document;
use crate::llm::provider::{AnalysisProvider, AnalysisRequest};
use crate::llm::schemas::{parse_violations, response_schema};
use anyhow::Result;
use async_trait::async_trait;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaturalLanguageRule {
    pub rule: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

impl NaturalLanguageRule {
    pub fn new(rule: impl Into<String>) -> Self {
        Self {
            rule: rule.into(),
            severity: None,
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }
}

/// Checks a document against a plain-language rule through an
/// [`AnalysisProvider`] and maps each reported text match back onto the
/// document.
pub struct NaturalLanguageScanner {
    id: String,
    document: Arc<Document>,
    rule: Arc<NaturalLanguageRule>,
    system_prompt: Arc<str>,
    provider: Arc<dyn AnalysisProvider>,
    recorder: IssueRecorder,
}

impl NaturalLanguageScanner {
    pub fn new(
        id: impl Into<String>,
        document: Arc<Document>,
        rule: Arc<NaturalLanguageRule>,
        system_prompt: Arc<str>,
        provider: Arc<dyn AnalysisProvider>,
    ) -> Self {
        Self {
            id: id.into(),
            document,
            rule,
            system_prompt,
            provider,
            recorder: IssueRecorder::new(),
        }
    }
}

#[async_trait]
impl AsyncScanner for NaturalLanguageScanner {
    async fn scan(&mut self) -> Result<()> {
        self.recorder.clear();

        let map = self.document.position_map();
        if map.is_blank() {
            debug!(scanner = %self.id, "Skipping analysis of blank document");
            return Ok(());
        }

        let request = AnalysisRequest {
            system_prompt: self.system_prompt.to_string(),
            document_text: map.text().to_string(),
            tool_schema: Some(response_schema()),
        };

        let call = AssertUnwindSafe(self.provider.analyze(request)).catch_unwind().await;
        let response = match call {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!(scanner = %self.id, "Analysis provider failed: {}", e);
                return Ok(());
            }
            Err(payload) => {
                warn!(
                    scanner = %self.id,
                    "Analysis provider panicked: {}",
                    panic_message(&*payload)
                );
                return Ok(());
            }
        };

        let severity = self.rule.severity.clone().unwrap_or_default();
        for violation in parse_violations(&response) {
            let Some((message, text_match)) = violation.usable() else {
                continue;
            };
            let occurrence = violation.occurrence_index.unwrap_or(0);
            let Some(range) = map.find_text_position(text_match, occurrence) else {
                debug!(
                    scanner = %self.id,
                    text_match,
                    occurrence,
                    "Reported text not found in document"
                );
                continue;
            };

            let mut issue = Issue::new(message, range.from as i64, range.to as i64)
                .with_severity(severity.clone());
            if let Some(suggestion) = &violation.suggestion {
                issue = issue.with_fix(FixOperation::ReplaceText {
                    text: suggestion.clone(),
                });
            }
            self.recorder.push(issue);
        }

        debug!(scanner = %self.id, count = self.recorder.len(), "Natural-language rule finished");
        Ok(())
    }

    fn results(&self) -> &[Issue] {
        self.recorder.issues()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::mock_provider::MockAnalysisProvider;
    use crate::llm::prompts::PromptBuilder;
    use serde_json::json;

    fn scanner(doc: Document, provider: Arc<MockAnalysisProvider>, rule: NaturalLanguageRule) -> NaturalLanguageScanner {
        let prompt: Arc<str> = PromptBuilder::new().build(&rule.rule).into();
        NaturalLanguageScanner::new("nl-test", Arc::new(doc), Arc::new(rule), prompt, provider)
    }

    #[tokio::test]
    async fn test_blank_document_skips_provider() {
        let provider = Arc::new(MockAnalysisProvider::new());
        let doc = Document::from_paragraphs(&["   ", ""]);
        let mut scanner = scanner(doc, provider.clone(), NaturalLanguageRule::new("No passive voice"));

        scanner.scan().await.unwrap();
        assert!(scanner.results().is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_maps_matches_and_occurrences() {
        let provider = Arc::new(MockAnalysisProvider::new().with_default(json!({
            "issues": [
                { "message": "Passive", "textMatch": "was done", "suggestion": "we did" },
                { "message": "Second", "textMatch": "was done", "occurrenceIndex": 1 },
                { "message": "Missing", "textMatch": "not in the text" },
                { "message": "Out of range", "textMatch": "was done", "occurrenceIndex": 5 }
            ]
        })));
        let doc = Document::from_paragraphs(&["It was done.", "It was done again."]);
        let rule = NaturalLanguageRule::new("No passive voice").with_severity(Severity::Error);
        let mut scanner = scanner(doc, provider.clone(), rule);

        scanner.scan().await.unwrap();
        let issues = scanner.results();
        assert_eq!(issues.len(), 2);

        // "It was done." starts at 1; the second paragraph's text at 15
        assert_eq!((issues[0].from, issues[0].to), (4, 12));
        assert_eq!(issues[0].severity, Severity::Error);
        assert_eq!(
            issues[0].fix,
            Some(FixOperation::ReplaceText {
                text: "we did".to_string()
            })
        );
        assert_eq!((issues[1].from, issues[1].to), (18, 26));
        assert_eq!(issues[1].fix, None);

        let request = provider.last_request().unwrap();
        assert_eq!(request.document_text, "It was done.\nIt was done again.");
        assert!(request.system_prompt.contains("No passive voice"));
        assert!(request.tool_schema.is_some());
    }

    #[tokio::test]
    async fn test_provider_failure_is_swallowed() {
        let provider = Arc::new(MockAnalysisProvider::failing());
        let doc = Document::from_paragraphs(&["Some text."]);
        let mut scanner = scanner(doc, provider.clone(), NaturalLanguageRule::new("Anything"));

        scanner.scan().await.unwrap();
        assert!(scanner.results().is_empty());
        assert_eq!(provider.call_count(), 1);
    }
}
