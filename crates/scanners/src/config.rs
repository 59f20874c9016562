use crate::core::{CustomSeverity, Severity, SeverityTable};
use crate::llm::{
    AnalysisProvider, NaturalLanguageRule, NaturalLanguageScannerFactory, PromptBuilder,
    PromptTemplate,
};
use crate::runner::{RunMode, ScannerDescriptor, ScannerRegistry};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown scanner '{0}'")]
    UnknownScanner(String),

    #[error("natural-language rule '{0}' has no rule text")]
    EmptyRule(String),

    #[error("natural-language rules are configured but no analysis provider is available")]
    MissingProvider,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_auto_run")]
    pub auto_run: bool,

    #[serde(default = "default_scanners")]
    pub scanners: Vec<ScannerSpec>,

    #[serde(default)]
    pub custom_severities: Vec<CustomSeverity>,

    #[serde(default)]
    pub natural_language: Vec<NaturalLanguageRuleConfig>,

    /// Instruction prompt for natural-language rules; `{rule}` is replaced
    /// with the rule text. The built-in prompt is used when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_template: Option<String>,
}

/// A scanner list entry: a bare id, or an id with a run mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScannerSpec {
    Id(String),
    Detailed {
        scanner: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        run_mode: Option<RunMode>,
    },
}

impl ScannerSpec {
    pub fn id(&self) -> &str {
        match self {
            Self::Id(id) => id,
            Self::Detailed { scanner, .. } => scanner,
        }
    }

    pub fn run_mode(&self) -> RunMode {
        match self {
            Self::Id(_) => RunMode::Auto,
            Self::Detailed { run_mode, .. } => run_mode.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaturalLanguageRuleConfig {
    pub id: String,
    pub rule: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_mode: Option<RunMode>,
}

fn default_auto_run() -> bool {
    true
}

fn default_scanners() -> Vec<ScannerSpec> {
    crate::rules::builtin_classes()
        .iter()
        .map(|class| ScannerSpec::Id(class.id().to_string()))
        .collect()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_run: default_auto_run(),
            scanners: default_scanners(),
            custom_severities: Vec::new(),
            natural_language: Vec::new(),
            prompt_template: None,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = read(path.as_ref())?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = read(path.as_ref())?;
        Ok(serde_json::from_str(&content)?)
    }

    /// JSON for `.json` files, YAML otherwise.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_yaml_file(path),
        }
    }

    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `INKCHECK_AUTO_RUN` and `INKCHECK_SCANNERS` from `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("INKCHECK_AUTO_RUN") {
            match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.auto_run = true,
                "0" | "false" | "no" | "off" => self.auto_run = false,
                other => warn!("Ignoring INKCHECK_AUTO_RUN={}", other),
            }
        }

        if let Some(value) = lookup("INKCHECK_SCANNERS") {
            self.scanners = value
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(|id| ScannerSpec::Id(id.to_string()))
                .collect();
        }
    }

    pub fn severity_table(&self) -> SeverityTable {
        SeverityTable::new(&self.custom_severities)
    }

    /// Register a scanner class for every natural-language rule.
    pub fn register_natural_language(
        &self,
        registry: &mut ScannerRegistry,
        provider: Option<Arc<dyn AnalysisProvider>>,
    ) -> Result<(), ConfigError> {
        if self.natural_language.is_empty() {
            return Ok(());
        }
        let provider = provider.ok_or(ConfigError::MissingProvider)?;
        let mut factory = NaturalLanguageScannerFactory::with_provider(provider);
        if let Some(template) = &self.prompt_template {
            factory = factory.with_prompts(PromptBuilder::with_template(PromptTemplate::new(
                "configured",
                template.clone(),
            )));
        }

        for entry in &self.natural_language {
            if entry.rule.trim().is_empty() {
                return Err(ConfigError::EmptyRule(entry.id.clone()));
            }
            let rule = NaturalLanguageRule {
                rule: entry.rule.clone(),
                severity: entry.severity.clone(),
            };
            debug!("Registering natural-language rule '{}'", entry.id);
            registry.register(factory.create(entry.id.clone(), rule));
        }
        Ok(())
    }

    /// Resolve the scanner list against `registry`, in configuration order.
    /// Natural-language rules not already listed follow the listed scanners.
    pub fn resolve(&self, registry: &ScannerRegistry) -> Result<Vec<ScannerDescriptor>, ConfigError> {
        let mut descriptors = Vec::with_capacity(self.scanners.len() + self.natural_language.len());
        let mut listed = HashSet::new();

        for spec in &self.scanners {
            let class = registry
                .get(spec.id())
                .ok_or_else(|| ConfigError::UnknownScanner(spec.id().to_string()))?;
            listed.insert(spec.id());
            descriptors.push(ScannerDescriptor::new(class, spec.run_mode()));
        }

        for entry in &self.natural_language {
            if listed.contains(entry.id.as_str()) {
                continue;
            }
            let class = registry
                .get(&entry.id)
                .ok_or_else(|| ConfigError::UnknownScanner(entry.id.clone()))?;
            descriptors.push(ScannerDescriptor::new(class, entry.run_mode.unwrap_or_default()));
        }

        Ok(descriptors)
    }
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub const EXAMPLE_CONFIG: &str = r##"
# inkcheck configuration

auto_run: true

scanners:
  - bad-words
  - heading-levels
  - scanner: repeated-words
    run_mode: on_demand
  - long-sentences

custom_severities:
  - name: tone
    color: "#8e44ad"

natural_language:
  - id: no-passive-voice
    rule: "Prefer active voice. Flag sentences written in the passive voice."
    severity: tone
    run_mode: on_demand
"##;
