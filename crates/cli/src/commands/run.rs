use super::{load_document, output_report, EngineArgs, OutputFormat};
use anyhow::{Context, Result};
use clap::Args;
use inkcheck_scanners::{OnDemandOptions, ScanReport};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub struct RunArgs {
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// Scanner id, configured or registered
    #[arg(short, long)]
    pub scanner: String,

    #[command(flatten)]
    pub engine: EngineArgs,

    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    pub format: OutputFormat,
}

pub async fn execute(args: RunArgs, verbose: bool) -> Result<()> {
    let engine = args.engine.build_engine()?;
    let document = Arc::new(load_document(&args.document)?);

    let issues = engine
        .run_on_demand(args.scanner.as_str(), document, OnDemandOptions::default())
        .await
        .with_context(|| format!("Scanner '{}' failed", args.scanner))?;

    output_report(&ScanReport::new(issues), args.format, verbose, Some(&args.document))
}
