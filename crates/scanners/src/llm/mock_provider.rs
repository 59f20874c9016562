use crate::llm::provider::{AnalysisProvider, AnalysisRequest, ProviderError};
use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Canned provider for tests and offline runs.
pub struct MockAnalysisProvider {
    responses: Vec<(String, Value)>,
    default_response: Value,
    call_count: AtomicUsize,
    should_fail: bool,
    delay: Option<Duration>,
    last_request: Mutex<Option<AnalysisRequest>>,
}

impl Default for MockAnalysisProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAnalysisProvider {
    pub fn new() -> Self {
        Self {
            responses: Vec::new(),
            default_response: json!({ "issues": [] }),
            call_count: AtomicUsize::new(0),
            should_fail: false,
            delay: None,
            last_request: Mutex::new(None),
        }
    }

    pub fn failing() -> Self {
        let mut provider = Self::new();
        provider.should_fail = true;
        provider
    }

    /// Serve the JSON stored in `path` for every request.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read mock response {}", path.display()))?;
        let response: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse mock response {}", path.display()))?;
        Ok(Self::new().with_default(response))
    }

    pub fn with_default(mut self, response: Value) -> Self {
        self.default_response = response;
        self
    }

    /// Serve `response` when the prompt or the document text mentions
    /// `pattern` (case-insensitive). Earlier patterns win.
    pub fn with_response(mut self, pattern: &str, response: Value) -> Self {
        self.responses.push((pattern.to_lowercase(), response));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn reset_count(&self) {
        self.call_count.store(0, Ordering::SeqCst);
    }

    pub fn last_request(&self) -> Option<AnalysisRequest> {
        self.last_request.lock().clone()
    }

    fn generate_response(&self, request: &AnalysisRequest) -> Value {
        let combined = format!("{} {}", request.system_prompt, request.document_text).to_lowercase();
        self.responses
            .iter()
            .find(|(pattern, _)| combined.contains(pattern.as_str()))
            .map(|(_, response)| response.clone())
            .unwrap_or_else(|| self.default_response.clone())
    }
}

#[async_trait]
impl AnalysisProvider for MockAnalysisProvider {
    async fn analyze(&self, request: AnalysisRequest) -> Result<Value, ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.should_fail {
            return Err(ProviderError::ApiError(
                "Mock provider configured to fail".to_string(),
            ));
        }

        Ok(self.generate_response(&request))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
