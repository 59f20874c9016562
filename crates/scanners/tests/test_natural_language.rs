use inkcheck_scanners::document::Document;
use inkcheck_scanners::{
    llm::{AnalysisProvider, AnalysisRequest, FnProvider, ProviderError},
    AnnotationEngine, EngineConfig, MockAnalysisProvider, NaturalLanguageScannerFactory,
    OnDemandOptions, ScannerRegistry, Severity,
};
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};

const CONFIG: &str = r##"
scanners:
  - bad-words
custom_severities:
  - name: tone
    color: "#8e44ad"
natural_language:
  - id: no-passive-voice
    rule: "Prefer active voice."
    severity: tone
"##;

fn engine(provider: Arc<dyn AnalysisProvider>) -> AnnotationEngine {
    let config: EngineConfig = serde_yaml::from_str(CONFIG).unwrap();
    AnnotationEngine::from_config(&config, ScannerRegistry::with_builtins(), Some(provider)).unwrap()
}

#[tokio::test]
async fn test_rule_issues_follow_sync_issues() {
    let provider = Arc::new(MockAnalysisProvider::new().with_default(json!({
        "issues": [
            { "message": "Passive voice", "textMatch": "was written", "suggestion": "wrote" },
            { "message": "Invented text", "textMatch": "never appears" }
        ]
    })));
    let engine = engine(provider.clone());

    engine
        .initialize(Arc::new(Document::from_paragraphs(&[
            "It was written simply.",
        ])))
        .await;

    let issues = engine.issues();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].message, "Avoid 'simply'");
    assert_eq!(issues[1].message, "Passive voice");
    assert_eq!((issues[1].from, issues[1].to), (4, 15));
    assert_eq!(issues[1].severity, Severity::from("tone"));
    assert_eq!(provider.call_count(), 1);

    let overlay = engine.overlay();
    assert_eq!(overlay.ranges()[1].style_class, "issue-tone");
}

#[tokio::test]
async fn test_provider_failure_leaves_other_scanners_intact() {
    let provider = Arc::new(MockAnalysisProvider::failing());
    let engine = engine(provider.clone());

    engine
        .initialize(Arc::new(Document::from_paragraphs(&["Clearly passive."])))
        .await;

    let issues = engine.issues();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0].message, "Avoid 'Clearly'");
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn test_blank_document_never_calls_provider() {
    let provider = Arc::new(MockAnalysisProvider::new());
    let engine = engine(provider.clone());

    engine
        .run_on_demand(
            "no-passive-voice",
            Arc::new(Document::from_paragraphs(&["", "  "])),
            OnDemandOptions::default(),
        )
        .await
        .unwrap();

    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_malformed_responses_yield_no_issues() {
    let responses = [
        json!("plain prose, no JSON here"),
        json!({ "issues": { "message": "not a list" } }),
        json!([{ "message": "top-level array", "textMatch": "x" }]),
    ];

    for response in responses {
        let provider = Arc::new(FnProvider::new(move |_request: AnalysisRequest| {
            let response = response.clone();
            async move { Ok::<_, ProviderError>(response) }
        }));
        let engine = engine(provider);

        let issues = engine
            .run_on_demand(
                "no-passive-voice",
                Arc::new(Document::from_paragraphs(&["Some x text."])),
                OnDemandOptions::default(),
            )
            .await
            .unwrap();
        assert!(issues.is_empty());
    }
}

#[tokio::test]
async fn test_rules_sharing_a_slow_provider_run_concurrently() {
    let provider = Arc::new(
        MockAnalysisProvider::new()
            .with_delay(Duration::from_millis(150))
            .with_default(json!({ "issues": [{ "message": "Vague", "textMatch": "stuff" }] })),
    );
    let factory = NaturalLanguageScannerFactory::with_provider(provider.clone());
    let engine = AnnotationEngine::builder()
        .with_scanner(factory.builder("vague-words").rule("Be specific.").build())
        .with_scanner(
            factory
                .builder("vague-nouns")
                .rule("Name things.")
                .severity("info")
                .build(),
        )
        .build();

    let started = Instant::now();
    engine
        .initialize(Arc::new(Document::from_paragraphs(&["Do the stuff."])))
        .await;
    let elapsed = started.elapsed();

    let issues = engine.issues();
    assert_eq!(issues.len(), 2);
    assert_eq!(issues[0].severity, Severity::Warning);
    assert_eq!(issues[1].severity, Severity::Info);
    assert_eq!(provider.call_count(), 2);
    assert!(elapsed < Duration::from_millis(280), "took {elapsed:?}");
}
