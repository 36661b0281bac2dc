//! Open command implementation
//!
//! Launches the platform opener on the hub's code editor page for each
//! tracked file.

use std::process::Command;

use colored::Colorize;

use hubsync_core::{FileRecord, ResourceKind};

use crate::context::RunContext;
use crate::error::{CliError, Result};

/// Platform URL opener: (program, leading args)
fn opener() -> (&'static str, &'static [&'static str]) {
    if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(windows) {
        ("cmd", &["/C", "start", ""])
    } else {
        ("xdg-open", &[])
    }
}

fn launch(url: &str) -> Result<()> {
    let (program, args) = opener();
    Command::new(program)
        .args(args)
        .arg(url)
        .spawn()
        .map_err(|e| CliError::user(format!("Failed to launch {}: {}", program, e)))?;
    Ok(())
}

fn selected(record: &FileRecord, names: &[String]) -> bool {
    names.is_empty()
        || record
            .relative_path
            .file_stem()
            .is_some_and(|stem| names.iter().any(|n| n == stem))
}

/// Run the open command
///
/// Records that are not on the hub yet have no editor page and are
/// reported as skipped.
pub async fn run_open(
    ctx: &RunContext,
    names: &[String],
    only: Option<ResourceKind>,
    print: bool,
) -> Result<()> {
    let manifest = ctx.build_manifest(only).await?;
    let records: Vec<&FileRecord> = manifest
        .records()
        .filter(|r| selected(r, names))
        .collect();

    if records.is_empty() {
        return Err(CliError::user(if names.is_empty() {
            "No tracked files in package".to_string()
        } else {
            format!("No tracked file named {}", names.join(", "))
        }));
    }

    for record in records {
        let Some(id) = &record.remote_id else {
            println!(
                "{} {} {}",
                format!("{:<7}", "SKIPPED").cyan().bold(),
                record.relative_path,
                "(not on hub)".dimmed()
            );
            continue;
        };

        let url = ctx.client.editor_url(record.kind, id);
        if print {
            println!("{}", url);
        } else {
            println!("{} {} {}", "=>".blue().bold(), record.relative_path, url.dimmed());
            launch(&url)?;
        }
    }
    Ok(())
}
