use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),
}

/// One analysis call: the rule-bearing instructions plus the flattened
/// document text.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub system_prompt: String,
    pub document_text: String,
    /// JSON schema describing the expected response, for providers that
    /// support structured output.
    pub tool_schema: Option<Value>,
}

/// External analysis backend consulted by natural-language rules.
///
/// Implementations return whatever JSON the backend produced; the scanner
/// validates its shape and ignores anything it cannot use.
#[async_trait]
pub trait AnalysisProvider: Send + Sync {
    async fn analyze(&self, request: AnalysisRequest) -> Result<Value, ProviderError>;

    fn model_name(&self) -> &str {
        "unknown"
    }
}

/// Adapts an async closure into an [`AnalysisProvider`].
pub struct FnProvider<F> {
    f: F,
}

impl<F> FnProvider<F> {
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> AnalysisProvider for FnProvider<F>
where
    F: Fn(AnalysisRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, ProviderError>> + Send,
{
    async fn analyze(&self, request: AnalysisRequest) -> Result<Value, ProviderError> {
        (self.f)(request).await
    }

    fn model_name(&self) -> &str {
        "closure"
    }
}
