use super::EngineArgs;
use anyhow::Result;
use clap::Args;
use colored::*;
use inkcheck_scanners::{core::ExecutionMode, RunMode};

#[derive(Args, Debug)]
pub struct ScannersArgs {
    #[command(flatten)]
    pub engine: EngineArgs,
}

pub fn execute(args: ScannersArgs) -> Result<()> {
    let engine = args.engine.build_engine()?;
    let configured = engine.orchestrator().list_scanners();

    println!("{}", "Configured scanners".bold());
    if !engine.auto_run() {
        println!("{}", "(auto-run disabled)".dimmed());
    }
    for info in &configured {
        let mode = match info.mode {
            ExecutionMode::Sync => "sync",
            ExecutionMode::Async => "async",
        };
        let run_mode = format!("{:<10}", info.run_mode.to_string());
        let run_mode = match info.run_mode {
            RunMode::Auto => run_mode.green(),
            RunMode::OnDemand => run_mode.cyan(),
        };
        println!("  {:<20} {:<6} {} {}", info.id, mode, run_mode, info.description);
    }

    let extra: Vec<_> = engine
        .registry()
        .all()
        .into_iter()
        .filter(|class| !configured.iter().any(|info| info.id == class.id()))
        .collect();
    if !extra.is_empty() {
        println!("\n{}", "Registered, not configured".bold());
        for class in extra {
            println!("  {:<20} {}", class.id(), class.description());
        }
    }

    Ok(())
}
