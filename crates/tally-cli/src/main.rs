use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "tally")]
#[command(about = "Tally CLI - inspect the agent performance ledger", long_about = None)]
struct Cli {
    /// Metrics directory holding the dashboard state files
    #[arg(long, global = true, default_value = ".tally")]
    dir: PathBuf,

    /// Project name used when the directory holds no state yet
    #[arg(long, global = true, default_value = "default")]
    project: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print on-disk footprint and entry counts
    Stats,
    /// Print the current ledger: totals, agents, recent events
    Show,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let store = tally_store::DurableStore::new(cli.project, cli.dir);

    match cli.command {
        Commands::Stats => commands::stats::run(&store),
        Commands::Show => commands::show::run(&store),
    }

    Ok(())
}
