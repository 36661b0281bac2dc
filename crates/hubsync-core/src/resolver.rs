//! Builds a [`Manifest`] from a package directory

use std::path::Path;

use walkdir::{DirEntry, WalkDir};

use hubsync_fs::NormalizedPath;
use hubsync_remote::{Directory, Remote, ResourceKind};

use crate::{Error, FileRecord, HubConfig, Manifest, Result};

/// Walks a package tree and resolves every tracked file to a remote id.
///
/// Only leaf directories are kind buckets. A bucket's name must map to a
/// [`ResourceKind`]; anything else aborts resolution, since syncing files
/// under the wrong kind would create resources of the wrong type.
pub struct ManifestResolver<'a, R: Remote + ?Sized> {
    remote: &'a R,
    directory: Directory,
    extension: String,
}

impl<'a, R: Remote + ?Sized> ManifestResolver<'a, R> {
    pub fn new(remote: &'a R, vendor_prefix: &str, extension: &str) -> Self {
        Self {
            remote,
            directory: Directory::new(vendor_prefix),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn from_config(remote: &'a R, config: &HubConfig) -> Self {
        Self::new(remote, &config.vendor_prefix, &config.extension)
    }

    /// Walk `root` and build the manifest.
    ///
    /// # Errors
    ///
    /// - [`Error::Configuration`] for a bucket with an unknown kind name
    /// - [`Error::Scan`] if the tree cannot be read
    /// - a remote error if a listing cannot be fetched
    pub async fn build_manifest(&mut self, root: &NormalizedPath) -> Result<Manifest> {
        let mut manifest = Manifest::new(root.clone());

        for bucket in leaf_directories(root.as_ref())? {
            let dir_name = bucket.file_name().to_string_lossy().to_string();
            let kind = ResourceKind::from_dir_name(&dir_name).map_err(|_| {
                Error::configuration(format!(
                    "unknown resource kind directory '{}' at {}",
                    dir_name,
                    NormalizedPath::new(bucket.path())
                ))
            })?;

            for file in source_files(bucket.path(), &self.extension)? {
                let relative = NormalizedPath::new(file.path())
                    .strip_prefix(root)
                    .unwrap_or_else(|| NormalizedPath::new(file.path()));
                let stem = relative.file_stem().unwrap_or_default().to_string();

                let remote_id = self
                    .directory
                    .resolve_id_by_name(self.remote, &stem, kind)
                    .await?;

                match &remote_id {
                    Some(id) => tracing::debug!(path = %relative, %kind, %id, "resolved"),
                    None => tracing::info!(path = %relative, %kind, "not on hub yet"),
                }

                manifest.add(FileRecord::new(root, relative, kind, remote_id))?;
            }
        }

        tracing::info!(root = %root, records = manifest.len(), "manifest built");
        Ok(manifest)
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Directories under `root` (including `root`) that have no subdirectories.
fn leaf_directories(root: &Path) -> Result<Vec<DirEntry>> {
    let mut leaves = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let mut has_subdir = false;
        for child in WalkDir::new(entry.path()).min_depth(1).max_depth(1) {
            let child = child?;
            if child.file_type().is_dir() && !is_hidden(&child) {
                has_subdir = true;
                break;
            }
        }

        if !has_subdir {
            leaves.push(entry);
        }
    }

    Ok(leaves)
}

/// Files directly inside `dir` with the tracked extension.
fn source_files(dir: &Path, extension: &str) -> Result<Vec<DirEntry>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let matches = entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == extension);
        if matches {
            files.push(entry);
        }
    }
    Ok(files)
}
