//! Status command implementation

use colored::Colorize;
use serde::Serialize;

use hubsync_core::{FileRecord, NormalizedPath, ResourceId, ResourceKind};
use hubsync_fs::{compute_content_checksum, io};

use crate::context::RunContext;
use crate::error::Result;

/// One tracked file as `status` reports it
#[derive(Debug, Serialize)]
struct StatusRow {
    path: NormalizedPath,
    kind: ResourceKind,
    remote_id: Option<ResourceId>,
    /// `sha256:<hex>` of the local content, `None` when unreadable
    checksum: Option<String>,
}

impl StatusRow {
    fn from_record(record: &FileRecord) -> Self {
        let checksum = match io::read_text(&record.local_path) {
            Ok(content) => Some(compute_content_checksum(&content)),
            Err(e) => {
                tracing::warn!(path = %record.local_path, error = %e, "could not read file");
                None
            }
        };
        Self {
            path: record.relative_path.clone(),
            kind: record.kind,
            remote_id: record.remote_id.clone(),
            checksum,
        }
    }
}

/// Run the status command
///
/// Resolves the manifest and lists it. Reads only.
pub async fn run_status(ctx: &RunContext, only: Option<ResourceKind>, json: bool) -> Result<()> {
    let manifest = ctx.build_manifest(only).await?;
    let rows: Vec<StatusRow> = manifest.records().map(StatusRow::from_record).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!(
        "{} Package {} ({})",
        "=>".blue().bold(),
        ctx.config.package.cyan(),
        manifest.root()
    );

    if rows.is_empty() {
        println!("   {}", "no tracked files".dimmed());
        return Ok(());
    }

    for row in &rows {
        let id = match &row.remote_id {
            Some(id) => format!("{:>6}", id).normal(),
            None => format!("{:>6}", "new").yellow(),
        };
        let checksum = row
            .checksum
            .as_deref()
            .and_then(|c| c.strip_prefix("sha256:"))
            .map(|hex| hex.chars().take(12).collect::<String>())
            .unwrap_or_else(|| "unreadable".to_string());
        println!(
            "   {:<6} {}  {}  {}",
            row.kind.to_string(),
            id,
            checksum.dimmed(),
            row.path
        );
    }

    let new = rows.iter().filter(|r| r.remote_id.is_none()).count();
    println!();
    println!(
        "{} tracked, {} on hub, {} new",
        rows.len(),
        rows.len() - new,
        new
    );
    Ok(())
}
