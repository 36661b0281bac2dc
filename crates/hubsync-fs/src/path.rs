//! Normalized path handling for manifest keys and watcher events

use std::path::{Path, PathBuf};

use serde::Serialize;

/// A path normalized to forward slashes.
///
/// Manifest records are keyed by these, and watcher events are converted
/// into them before matching, so both sides must agree on one spelling:
/// backslashes become `/`, repeated separators collapse, a leading `./`
/// and any trailing `/` are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: normalize(&path.as_ref().to_string_lossy()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a relative segment.
    pub fn join(&self, segment: &str) -> Self {
        if self.inner.is_empty() {
            return Self::new(segment);
        }
        Self {
            inner: normalize(&format!("{}/{}", self.inner, segment)),
        }
    }

    /// Path of `self` relative to `base`, compared component-wise.
    ///
    /// Returns `None` when `self` is not inside `base`.
    pub fn strip_prefix(&self, base: &NormalizedPath) -> Option<Self> {
        if base.inner.is_empty() {
            return Some(self.clone());
        }
        if self.inner == base.inner {
            return Some(Self {
                inner: String::new(),
            });
        }
        let rest = self.inner.strip_prefix(&base.inner)?;
        let rest = if base.inner.ends_with('/') {
            rest
        } else {
            rest.strip_prefix('/')?
        };
        Some(Self {
            inner: rest.to_string(),
        })
    }

    /// The last path component.
    pub fn file_name(&self) -> Option<&str> {
        self.inner.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// The last path component without its extension.
    pub fn file_stem(&self) -> Option<&str> {
        let name = self.file_name()?;
        match name.rfind('.') {
            Some(idx) if idx > 0 => Some(&name[..idx]),
            _ => Some(name),
        }
    }

    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        let idx = name.rfind('.')?;
        if idx == 0 { None } else { Some(&name[idx + 1..]) }
    }

    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }
}

fn normalize(raw: &str) -> String {
    let replaced = raw.replace('\\', "/");
    let absolute = replaced.starts_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for part in replaced.split('/') {
        if part.is_empty() || (part == "." && parts.is_empty()) {
            continue;
        }
        parts.push(part);
    }

    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}
