use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
use commands::{check::CheckArgs, run::RunArgs, scanners::ScannersArgs};

#[derive(Parser)]
#[command(name = "inkcheck")]
#[command(about = "Annotate rich-text documents with style and rule issues")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every auto scanner over a document
    Check(CheckArgs),

    /// Run a single scanner on demand
    Run(RunArgs),

    /// List configured and registered scanners
    Scanners(ScannersArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let runtime = tokio::runtime::Runtime::new()?;
    match cli.command {
        Commands::Check(args) => runtime.block_on(commands::check::execute(args, cli.verbose)),
        Commands::Run(args) => runtime.block_on(commands::run::execute(args, cli.verbose)),
        Commands::Scanners(args) => commands::scanners::execute(args),
    }
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("inkcheck_scanners=debug,inkcheck=debug,warn")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
