use super::{load_document, output_report, EngineArgs, OutputFormat};
use anyhow::Result;
use clap::Args;
use colored::*;
use inkcheck_scanners::{IgnoreList, MutationOutcome, ScanReport};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Document as ProseMirror-style JSON
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// JSON list of dismissed issues ({from, to, message})
    #[arg(long)]
    pub ignore: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Console)]
    pub format: OutputFormat,
}

pub async fn execute(args: CheckArgs, verbose: bool) -> Result<()> {
    let engine = args.engine.build_engine()?;
    if let Some(path) = &args.ignore {
        engine.load_ignore_list(IgnoreList::from_json_file(path)?);
    }

    let document = Arc::new(load_document(&args.document)?);
    debug!(
        path = %args.document.display(),
        size = document.content_size(),
        "Loaded document"
    );
    if let MutationOutcome::Disabled = engine.initialize(document).await {
        eprintln!(
            "{}",
            "Auto-run is disabled in the configuration; use `inkcheck run` instead.".yellow()
        );
    }

    let report = {
        let state = engine.state();
        let state = state.lock();
        ScanReport::partitioned(state.issues().to_vec(), |issue| state.is_ignored(issue))
    };

    output_report(&report, args.format, verbose, Some(&args.document))
}
