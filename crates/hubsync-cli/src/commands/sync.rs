//! Sync command implementation
//!
//! Bulk upload or retrieve over the whole manifest, optionally followed by
//! the change-triggered upload loop.

use colored::Colorize;
use tokio::sync::mpsc;

use hubsync_core::{Direction, Error, FileWatcher, SyncEngine, WatchLoop, watch::EVENT_BUFFER};
use hubsync_remote::ResourceKind;

use crate::context::RunContext;
use crate::error::{CliError, Result};
use crate::output;

/// Run the sync command
///
/// Every record is attempted; the command fails afterwards if any did.
pub async fn run_sync(
    ctx: &RunContext,
    direction: Direction,
    watch: bool,
    only: Option<ResourceKind>,
    json: bool,
) -> Result<()> {
    if watch && direction != Direction::Upload {
        return Err(Error::configuration("--watch requires --direction upload").into());
    }

    if !json {
        println!(
            "{} {} package {} with {}",
            "=>".blue().bold(),
            match direction {
                Direction::Upload => "Uploading",
                Direction::Retrieve => "Retrieving",
            },
            ctx.config.package.cyan(),
            ctx.client.base_url()
        );
    }

    let mut manifest = ctx.build_manifest(only).await?;
    let engine = SyncEngine::new(&ctx.client);

    let report = engine
        .sync_all_with(&mut manifest, direction, |outcome| {
            if !json {
                output::print_outcome(outcome);
            }
        })
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_summary(&report);
    }

    if watch {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let watcher = FileWatcher::start(manifest.root(), tx)?;

        if !json {
            println!();
            println!(
                "{} Watching {} for changes. Press {} to stop.",
                "=>".blue().bold(),
                manifest.root().as_str().cyan(),
                "Ctrl-C".bold()
            );
        }

        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "could not listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        };

        WatchLoop::new(engine, &mut manifest)
            .run(rx, shutdown, |outcome| {
                if json {
                    match serde_json::to_string(outcome) {
                        Ok(line) => println!("{}", line),
                        Err(e) => tracing::error!(error = %e, "could not render outcome"),
                    }
                } else {
                    output::print_outcome(outcome);
                }
            })
            .await;

        drop(watcher);
        if !json {
            println!("{} Stopped watching.", "OK".green().bold());
        }
    }

    if !report.success() {
        return Err(CliError::SyncFailed {
            failed: report.failed(),
            total: report.outcomes.len(),
        });
    }
    Ok(())
}
