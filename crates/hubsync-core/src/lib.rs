//! Synchronization core for hubsync
//!
//! Keeps a package of local app and driver sources in step with the code
//! hosted on a hub:
//!
//! - **Configuration**: explicit [`HubConfig`], never process-global
//! - **Manifest**: local file -> remote id -> kind, rebuilt every run
//! - **Resolver**: walks the package tree and resolves ids by name
//! - **SyncEngine**: per-file compare and upload/retrieve with isolated failures
//! - **WatchLoop**: uploads tracked files as they change, until cancelled
//!
//! # Architecture
//!
//! ```text
//!                 hubsync-cli
//!                      |
//!                 hubsync-core
//!                  /        \
//!          hubsync-fs    hubsync-remote
//! ```

pub mod config;
pub mod error;
pub mod manifest;
pub mod resolver;
pub mod sync;
pub mod watch;

pub use config::{ConfigOverrides, Direction, FileConfig, HubConfig};
pub use error::{Error, FailureKind, Result};
pub use manifest::{FileRecord, Manifest};
pub use resolver::ManifestResolver;
pub use sync::{Outcome, OutcomeStatus, SkipReason, SyncEngine, SyncReport};
pub use watch::{ChangeEvent, FileWatcher, WatchLoop};

pub use hubsync_fs::NormalizedPath;
pub use hubsync_remote::{ResourceId, ResourceKind};
