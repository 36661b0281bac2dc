//! Run configuration
//!
//! A [`HubConfig`] is resolved once per invocation from three layers,
//! highest precedence first: command-line/environment overrides, an
//! optional `hubsync.{toml,json,yaml}` file, built-in defaults.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use hubsync_fs::{ConfigStore, NormalizedPath};

use crate::{Error, Result};

/// Stem of the config file looked up in the working directory.
pub const CONFIG_FILE_STEM: &str = "hubsync";

/// Prefix the hub's listings put in front of display names.
pub const DEFAULT_VENDOR_PREFIX: &str = "FLO ";

/// Extension of tracked source files.
pub const DEFAULT_EXTENSION: &str = "groovy";

/// Which side wins a sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Local -> remote
    Upload,
    /// Remote -> local
    Retrieve,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upload => write!(f, "upload"),
            Self::Retrieve => write!(f, "retrieve"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "upload" | "up" => Ok(Self::Upload),
            "retrieve" | "down" => Ok(Self::Retrieve),
            other => Err(Error::configuration(format!(
                "unknown direction '{}' (expected upload or retrieve)",
                other
            ))),
        }
    }
}

/// Values read from a config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub host: Option<String>,
    pub package: Option<String>,
    pub workspace: Option<PathBuf>,
    pub vendor_prefix: Option<String>,
    pub extension: Option<String>,
}

impl FileConfig {
    /// Load `explicit` if given, otherwise the first `hubsync.*` file found
    /// in `dir`.
    ///
    /// An explicit path that does not exist is a configuration error; no
    /// file in `dir` simply yields `None`.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Option<Self>> {
        let store = ConfigStore::new();

        if let Some(path) = explicit {
            let path = NormalizedPath::new(path);
            if !path.exists() {
                return Err(Error::configuration(format!(
                    "config file {} does not exist",
                    path
                )));
            }
            return Ok(Some(store.load(&path).map_err(config_file_error)?));
        }

        let dir = NormalizedPath::new(dir);
        let candidates: Vec<NormalizedPath> = ["toml", "json", "yaml", "yml"]
            .iter()
            .map(|ext| dir.join(&format!("{}.{}", CONFIG_FILE_STEM, ext)))
            .collect();

        let loaded = store.load_first(&candidates).map_err(config_file_error)?;
        Ok(loaded.map(|(path, config)| {
            tracing::debug!(%path, "loaded config file");
            config
        }))
    }
}

fn config_file_error(error: hubsync_fs::Error) -> Error {
    Error::configuration(error.to_string())
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub package: Option<String>,
    pub workspace: Option<PathBuf>,
}

/// Resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    /// Hub address, host/IP or full base URL
    pub host: String,
    /// Package directory name under `workspace`
    pub package: String,
    /// Directory holding packages
    pub workspace: PathBuf,
    pub vendor_prefix: String,
    pub extension: String,
}

impl HubConfig {
    /// Merge overrides over the file config over defaults.
    ///
    /// `cwd` is the default workspace. Fails when host or package is
    /// still missing after merging.
    pub fn resolve(
        overrides: ConfigOverrides,
        file: Option<FileConfig>,
        cwd: &Path,
    ) -> Result<Self> {
        let file = file.unwrap_or_default();

        let host = non_empty(overrides.host)
            .or(non_empty(file.host))
            .ok_or_else(|| {
                Error::configuration("no hub address; pass --host or set HUBITAT")
            })?;
        let package = non_empty(overrides.package)
            .or(non_empty(file.package))
            .ok_or_else(|| {
                Error::configuration("no package selected; pass --package or set TARGET")
            })?;
        let workspace = overrides
            .workspace
            .or(file.workspace)
            .map(|dir| if dir.is_absolute() { dir } else { cwd.join(dir) })
            .unwrap_or_else(|| cwd.to_path_buf());

        Ok(Self {
            host,
            package,
            workspace,
            vendor_prefix: file
                .vendor_prefix
                .unwrap_or_else(|| DEFAULT_VENDOR_PREFIX.to_string()),
            extension: file
                .extension
                .map(|ext| ext.trim_start_matches('.').to_string())
                .unwrap_or_else(|| DEFAULT_EXTENSION.to_string()),
        })
    }

    /// Directory holding the selected package's `apps/` and `drivers/`.
    pub fn package_root(&self) -> NormalizedPath {
        NormalizedPath::new(&self.workspace).join(&self.package)
    }

    /// Check the package directory exists before anything touches the hub.
    pub fn validate(&self) -> Result<()> {
        let root = self.package_root();
        if !root.is_dir() {
            return Err(Error::configuration(format!(
                "package directory {} does not exist",
                root
            )));
        }
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
