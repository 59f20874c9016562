use crate::llm::provider::{AnalysisProvider, AnalysisRequest, ProviderError};
use crate::llm::schemas::extract_json_from_text;
use anyhow::Result;
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, ChatCompletionResponseFormat,
        ChatCompletionResponseFormatType, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub struct OpenAIProvider {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    max_retries: u32,
    timeout: Duration,
}

impl OpenAIProvider {
    pub fn new(model: Option<String>) -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| anyhow::anyhow!("OPENAI_API_KEY not set"))?;
        Ok(Self::with_config(
            api_key,
            model.unwrap_or_else(|| "gpt-4o-mini".to_string()),
            0.0,
            2000,
        ))
    }

    pub fn with_config(api_key: String, model: String, temperature: f32, max_tokens: u32) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        Self {
            client: Client::with_config(config),
            model,
            temperature,
            max_tokens,
            max_retries: 3,
            timeout: Duration::from_secs(60),
        }
    }

    /// Per-attempt limit on a single completion call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn system_prompt(request: &AnalysisRequest) -> String {
        match &request.tool_schema {
            Some(schema) => format!(
                "{}\n\nRespond with a single JSON object matching this schema:\n{}",
                request.system_prompt, schema
            ),
            None => request.system_prompt.clone(),
        }
    }
}

#[async_trait]
impl AnalysisProvider for OpenAIProvider {
    async fn analyze(&self, request: AnalysisRequest) -> Result<Value, ProviderError> {
        debug!("Sending analysis request to OpenAI model: {}", self.model);

        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: Self::system_prompt(&request),
                ..Default::default()
            }),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: async_openai::types::ChatCompletionRequestUserMessageContent::Text(
                    request.document_text.clone(),
                ),
                ..Default::default()
            }),
        ];

        let api_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .response_format(ChatCompletionResponseFormat {
                r#type: ChatCompletionResponseFormatType::JsonObject,
            })
            .build()
            .map_err(|e| ProviderError::ApiError(e.to_string()))?;

        let mut attempt = 0;
        let response = loop {
            attempt += 1;
            let call = self.client.chat().create(api_request.clone());
            let error = match tokio::time::timeout(self.timeout, call).await {
                Ok(Ok(response)) => break response,
                Ok(Err(e)) => classify(e),
                Err(_) => ProviderError::Timeout(self.timeout.as_secs()),
            };

            warn!("OpenAI request failed (attempt {}): {}", attempt, error);
            if attempt >= self.max_retries {
                return Err(error);
            }
            let wait = match error {
                ProviderError::RateLimitExceeded => Duration::from_secs(2_u64.pow(attempt)),
                _ => Duration::from_millis(100 * attempt as u64),
            };
            tokio::time::sleep(wait).await;
        };

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| ProviderError::InvalidResponse("No content in response".to_string()))?;

        serde_json::from_str(&extract_json_from_text(&content))
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn classify(error: OpenAIError) -> ProviderError {
    match error {
        OpenAIError::Reqwest(e) => ProviderError::NetworkError(e.to_string()),
        other => {
            let message = other.to_string();
            if message.to_lowercase().contains("rate limit") {
                ProviderError::RateLimitExceeded
            } else {
                ProviderError::ApiError(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_errors() {
        assert!(matches!(
            classify(OpenAIError::InvalidArgument("bad model".to_string())),
            ProviderError::ApiError(ref m) if m.contains("bad model")
        ));
        assert!(matches!(
            classify(OpenAIError::InvalidArgument("Rate limit reached".to_string())),
            ProviderError::RateLimitExceeded
        ));
    }
}
