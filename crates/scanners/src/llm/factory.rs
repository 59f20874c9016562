use crate::core::{ScannerClass, Severity};
use crate::llm::prompts::PromptBuilder;
use crate::llm::provider::AnalysisProvider;
use crate::llm::scanner::{NaturalLanguageRule, NaturalLanguageScanner};
use std::sync::Arc;

#[cfg(feature = "openai")]
use crate::llm::openai::OpenAIProvider;

/// Builds scanner classes for natural-language rules that share one
/// provider.
pub struct NaturalLanguageScannerFactory {
    provider: Arc<dyn AnalysisProvider>,
    prompts: PromptBuilder,
}

impl NaturalLanguageScannerFactory {
    #[cfg(feature = "openai")]
    pub fn new_openai(model: Option<String>) -> anyhow::Result<Self> {
        let provider = OpenAIProvider::new(model)?;
        Ok(Self::with_provider(Arc::new(provider)))
    }

    pub fn with_provider(provider: Arc<dyn AnalysisProvider>) -> Self {
        Self {
            provider,
            prompts: PromptBuilder::new(),
        }
    }

    pub fn with_prompts(mut self, prompts: PromptBuilder) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn provider(&self) -> &Arc<dyn AnalysisProvider> {
        &self.provider
    }

    pub fn create(&self, id: impl Into<String>, rule: NaturalLanguageRule) -> ScannerClass {
        let id = id.into();
        let description = format!("Natural-language rule: {}", rule.rule.trim());
        let system_prompt: Arc<str> = self.prompts.build(&rule.rule).into();
        let rule = Arc::new(rule);
        let provider = self.provider.clone();
        let scanner_id = id.clone();

        ScannerClass::asynchronous(id, move |document| {
            NaturalLanguageScanner::new(
                scanner_id.clone(),
                document,
                rule.clone(),
                system_prompt.clone(),
                provider.clone(),
            )
        })
        .with_description(description)
    }

    pub fn builder(&self, id: impl Into<String>) -> NaturalLanguageScannerBuilder<'_> {
        NaturalLanguageScannerBuilder {
            factory: self,
            id: id.into(),
            rule: String::new(),
            severity: None,
        }
    }
}

pub struct NaturalLanguageScannerBuilder<'a> {
    factory: &'a NaturalLanguageScannerFactory,
    id: String,
    rule: String,
    severity: Option<Severity>,
}

impl NaturalLanguageScannerBuilder<'_> {
    pub fn rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = rule.into();
        self
    }

    pub fn severity(mut self, severity: impl Into<Severity>) -> Self {
        self.severity = Some(severity.into());
        self
    }

    pub fn build(self) -> ScannerClass {
        let rule = NaturalLanguageRule {
            rule: self.rule,
            severity: self.severity,
        };
        self.factory.create(self.id, rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ExecutionMode, ScannerInstance};
    use crate::document::Document;
    use crate::llm::mock_provider::MockAnalysisProvider;
    use serde_json::json;

    #[tokio::test]
    async fn test_built_class_is_async_and_fresh_per_document() {
        let provider = Arc::new(MockAnalysisProvider::new().with_default(json!({
            "issues": [{ "message": "Hedge word", "textMatch": "maybe" }]
        })));
        let factory = NaturalLanguageScannerFactory::with_provider(provider.clone());
        let class = factory
            .builder("no-hedging")
            .rule("Do not hedge.")
            .severity("info")
            .build();

        assert_eq!(class.id(), "no-hedging");
        assert_eq!(class.mode(), ExecutionMode::Async);
        assert!(class.description().contains("Do not hedge."));

        for text in ["maybe so", "so maybe"] {
            let doc = Arc::new(Document::from_paragraphs(&[text]));
            let ScannerInstance::Async(mut scanner) = class.instantiate(doc).unwrap() else {
                panic!("expected an async scanner");
            };
            scanner.scan().await.unwrap();
            assert_eq!(scanner.results().len(), 1);
            assert_eq!(scanner.results()[0].severity, Severity::Info);
        }
        assert_eq!(provider.call_count(), 2);
    }
}
