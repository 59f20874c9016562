//! Command implementations for the inkcheck CLI
//!
//! `check` runs the auto pipeline once over a document and prints the
//! visible issues, `run` executes one scanner on demand, and `scanners`
//! lists what the configuration resolves to.

pub mod check;
pub mod run;
pub mod scanners;

use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::*;
use inkcheck_scanners::{
    AnalysisProvider, AnnotationEngine, EngineConfig, MockAnalysisProvider, ScanReport,
    ScannerRegistry, Severity,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

/// Options shared by every command that builds an engine.
#[derive(clap::Args, Debug, Clone)]
pub struct EngineArgs {
    /// YAML or JSON configuration (defaults plus INKCHECK_* overrides when absent)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Serve this JSON file as every analysis response
    #[arg(long)]
    pub mock_provider: Option<PathBuf>,

    /// Model for the OpenAI provider
    #[cfg(feature = "openai")]
    #[arg(long)]
    pub model: Option<String>,
}

impl EngineArgs {
    pub fn load_config(&self) -> Result<EngineConfig> {
        match &self.config {
            Some(path) => {
                let mut config = EngineConfig::from_file(path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?;
                config.apply_overrides(|key| std::env::var(key).ok());
                Ok(config)
            }
            None => Ok(EngineConfig::from_env()),
        }
    }

    pub fn provider(&self) -> Result<Option<Arc<dyn AnalysisProvider>>> {
        if let Some(path) = &self.mock_provider {
            let provider = MockAnalysisProvider::from_json_file(path)?;
            return Ok(Some(Arc::new(provider)));
        }
        self.default_provider()
    }

    #[cfg(feature = "openai")]
    fn default_provider(&self) -> Result<Option<Arc<dyn AnalysisProvider>>> {
        if std::env::var("OPENAI_API_KEY").is_err() {
            return Ok(None);
        }
        let provider = inkcheck_scanners::llm::OpenAIProvider::new(self.model.clone())?;
        Ok(Some(Arc::new(provider)))
    }

    #[cfg(not(feature = "openai"))]
    fn default_provider(&self) -> Result<Option<Arc<dyn AnalysisProvider>>> {
        Ok(None)
    }

    pub fn build_engine(&self) -> Result<AnnotationEngine> {
        let config = self.load_config()?;
        let engine =
            AnnotationEngine::from_config(&config, ScannerRegistry::with_builtins(), self.provider()?)
                .context("Invalid scanner configuration")?;
        Ok(engine)
    }
}

pub fn load_document(path: &Path) -> Result<inkcheck_scanners::Document> {
    inkcheck_scanners::Document::from_json_file(path)
}

pub fn output_report(
    report: &ScanReport,
    format: OutputFormat,
    verbose: bool,
    file_path: Option<&Path>,
) -> Result<()> {
    match format {
        OutputFormat::Console => {
            if let Some(path) = file_path {
                println!("\n{} {}", "Results for:".bold(), path.display());
            }

            let issues = report.issues();
            if issues.is_empty() {
                println!("{}", "No issues found".bright_green());
            } else {
                println!("Found {} issue(s):", issues.len());
                for (i, issue) in issues.iter().enumerate() {
                    println!(
                        "\n{}. {} [{}..{}] {}",
                        i + 1,
                        severity_label(&issue.severity),
                        issue.from,
                        issue.to,
                        issue.message
                    );
                    if verbose {
                        if let Some(fix) = &issue.fix {
                            println!("   Fix: {}", serde_json::to_string(fix)?);
                        }
                    }
                }
            }

            if !report.dismissed().is_empty() {
                println!(
                    "\n{}",
                    format!("{} dismissed issue(s) hidden", report.dismissed().len()).dimmed()
                );
            }
        }
        OutputFormat::Json => {
            println!("{}", report.to_json()?);
        }
        OutputFormat::Markdown => {
            println!("{}", report.to_markdown());
        }
    }
    Ok(())
}

fn severity_label(severity: &Severity) -> ColoredString {
    let label = severity.as_str().to_uppercase();
    match severity {
        Severity::Error => label.bright_red().bold(),
        Severity::Warning => label.yellow().bold(),
        Severity::Info => label.bright_blue(),
        Severity::Custom(_) => label.magenta(),
    }
}
