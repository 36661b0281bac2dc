//! The resolved mapping of local files to remote resources

use serde::Serialize;

use hubsync_fs::NormalizedPath;
use hubsync_remote::{ResourceId, ResourceKind};

use crate::{Error, Result};

/// One tracked source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// Path used for I/O, the package root joined with `relative_path`
    pub local_path: NormalizedPath,
    /// Path inside the package root, e.g. `apps/Manager.groovy`
    pub relative_path: NormalizedPath,
    pub kind: ResourceKind,
    /// `None` until the resource exists on the hub
    pub remote_id: Option<ResourceId>,
}

impl FileRecord {
    pub fn new(
        root: &NormalizedPath,
        relative_path: impl Into<NormalizedPath>,
        kind: ResourceKind,
        remote_id: Option<ResourceId>,
    ) -> Self {
        let relative_path = relative_path.into();
        Self {
            local_path: root.join(relative_path.as_str()),
            relative_path,
            kind,
            remote_id,
        }
    }
}

/// Records for one package, grouped by kind.
///
/// Built fresh for every run. Local paths are unique across both kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Manifest {
    root: NormalizedPath,
    apps: Vec<FileRecord>,
    drivers: Vec<FileRecord>,
}

impl Manifest {
    pub fn new(root: impl Into<NormalizedPath>) -> Self {
        Self {
            root: root.into(),
            apps: Vec::new(),
            drivers: Vec::new(),
        }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    /// Add a record under its kind.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateRecord`] if a record with the same local
    /// path already exists, whatever its kind.
    pub fn add(&mut self, record: FileRecord) -> Result<()> {
        if self.records().any(|r| r.local_path == record.local_path) {
            return Err(Error::DuplicateRecord {
                path: record.local_path,
            });
        }
        self.bucket_mut(record.kind).push(record);
        Ok(())
    }

    pub fn records_of(&self, kind: ResourceKind) -> &[FileRecord] {
        match kind {
            ResourceKind::App => &self.apps,
            ResourceKind::Driver => &self.drivers,
        }
    }

    fn bucket_mut(&mut self, kind: ResourceKind) -> &mut Vec<FileRecord> {
        match kind {
            ResourceKind::App => &mut self.apps,
            ResourceKind::Driver => &mut self.drivers,
        }
    }

    /// All records, apps first.
    pub fn records(&self) -> impl Iterator<Item = &FileRecord> {
        self.apps.iter().chain(self.drivers.iter())
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut FileRecord> {
        self.apps.iter_mut().chain(self.drivers.iter_mut())
    }

    /// Records whose path inside the package equals `relative_path`.
    pub fn matching_mut<'a>(
        &'a mut self,
        relative_path: &'a NormalizedPath,
    ) -> impl Iterator<Item = &'a mut FileRecord> + 'a {
        self.records_mut()
            .filter(move |r| &r.relative_path == relative_path)
    }

    /// Drop every record whose kind is not in `kinds`.
    pub fn retain_kinds(&mut self, kinds: &[ResourceKind]) {
        for kind in ResourceKind::ALL {
            if !kinds.contains(&kind) {
                self.bucket_mut(kind).clear();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.apps.len() + self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
