//! hubsync CLI
//!
//! Keeps a local package of app and driver sources in step with a hub.

mod cli;
mod commands;
mod context;
mod error;
mod logging;
mod output;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use context::RunContext;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: could not set up logging: {}", "warning".yellow().bold(), e);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(execute_command(cli))
}

async fn execute_command(cli: Cli) -> Result<()> {
    let ctx = RunContext::load(&cli.global)?;

    match cli.command {
        Commands::Sync {
            direction,
            watch,
            only,
            json,
        } => commands::run_sync(&ctx, direction, watch, only, json).await,
        Commands::Status { only, json } => commands::run_status(&ctx, only, json).await,
        Commands::Open { names, only, print } => {
            commands::run_open(&ctx, &names, only, print).await
        }
    }
}
