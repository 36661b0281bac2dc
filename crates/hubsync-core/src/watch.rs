//! Change-triggered uploads
//!
//! A [`FileWatcher`] turns filesystem notifications into [`ChangeEvent`]s on
//! a channel; a [`WatchLoop`] consumes them and runs the same
//! [`SyncEngine::sync_up`] path as a bulk upload, one event at a time, until
//! its shutdown future resolves.

use std::future::Future;
use std::path::{Path, PathBuf};

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use hubsync_fs::{NormalizedPath, io};
use hubsync_remote::Remote;

use crate::{Manifest, Outcome, Result, SyncEngine};

/// Capacity of the channel between the watcher thread and the loop.
pub const EVENT_BUFFER: usize = 256;

/// A file under the watched root was modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Extract modification events from a raw notification.
///
/// Creates, removes and renames are ignored: only content changes to
/// files already in the manifest can trigger an upload.
///
/// Renames include [`ModifyKind::Name`], so an editor that saves by writing
/// a temporary file and renaming it over the source does not trigger an
/// upload. Such saves are picked up by the next bulk `sync -d upload`.
pub fn changes_from_event(event: Event) -> Vec<ChangeEvent> {
    match event.kind {
        EventKind::Modify(ModifyKind::Data(_))
        | EventKind::Modify(ModifyKind::Metadata(_))
        | EventKind::Modify(ModifyKind::Any) => {
            event.paths.into_iter().map(ChangeEvent::new).collect()
        }
        _ => Vec::new(),
    }
}

/// Recursive filesystem watch over a package root.
///
/// Dropping the watcher tears the watch down.
pub struct FileWatcher {
    watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Start watching `root`, forwarding modifications to `tx`.
    ///
    /// Events are forwarded in arrival order without coalescing; the
    /// watcher thread blocks when the channel is full.
    pub fn start(root: &NormalizedPath, tx: mpsc::Sender<ChangeEvent>) -> Result<Self> {
        let root = root.to_native();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    for change in changes_from_event(event) {
                        if tx.blocking_send(change).is_err() {
                            tracing::debug!("watch loop gone, dropping event");
                            return;
                        }
                    }
                }
                Err(e) => tracing::error!(error = %e, "watch error"),
            },
            notify::Config::default(),
        )?;
        watcher.watch(&root, RecursiveMode::Recursive)?;
        tracing::info!(root = %root.display(), "watching for changes");
        Ok(Self { watcher, root })
    }

    /// Stop watching. Equivalent to dropping, but reports unwatch errors.
    pub fn stop(mut self) -> Result<()> {
        self.watcher.unwatch(&self.root)?;
        tracing::info!(root = %self.root.display(), "stopped watching");
        Ok(())
    }
}

/// Uploads manifest records as their files change.
pub struct WatchLoop<'a, R: Remote + ?Sized> {
    engine: SyncEngine<'a, R>,
    manifest: &'a mut Manifest,
    roots: Vec<NormalizedPath>,
}

impl<'a, R: Remote + ?Sized> WatchLoop<'a, R> {
    pub fn new(engine: SyncEngine<'a, R>, manifest: &'a mut Manifest) -> Self {
        // Watchers report canonical absolute paths; keep the configured
        // spelling too so relative event paths still match.
        let mut roots = vec![manifest.root().clone()];
        match io::canonical_dir(manifest.root()) {
            Ok(canonical) if canonical != *manifest.root() => roots.insert(0, canonical),
            Ok(_) => {}
            Err(e) => tracing::warn!(error = %e, "could not canonicalize package root"),
        }

        Self {
            engine,
            manifest,
            roots,
        }
    }

    /// Path of `path` inside the package root, if it is inside it.
    fn relative(&self, path: &Path) -> Option<NormalizedPath> {
        let path = NormalizedPath::new(path);
        self.roots
            .iter()
            .find_map(|root| path.strip_prefix(root))
            .filter(|relative| !relative.as_str().is_empty())
    }

    /// Upload every record matching the event's path.
    ///
    /// Normally at most one record matches; an event for an untracked
    /// path does nothing.
    pub async fn handle(&mut self, event: &ChangeEvent) -> Vec<Outcome> {
        let Some(relative) = self.relative(&event.path) else {
            tracing::debug!(path = %event.path.display(), "change outside package root, ignored");
            return Vec::new();
        };

        let mut outcomes = Vec::new();
        for record in self.manifest.matching_mut(&relative) {
            tracing::info!(path = %record.local_path, "change detected");
            outcomes.push(self.engine.sync_up(record).await);
        }

        if outcomes.is_empty() {
            tracing::debug!(path = %relative, "change to untracked file, ignored");
        }
        outcomes
    }

    /// Handle events until `shutdown` resolves or the channel closes.
    ///
    /// Shutdown is only observed between events: a sync that has started
    /// runs to completion. Returns every outcome produced.
    pub async fn run<S, F>(
        mut self,
        mut events: mpsc::Receiver<ChangeEvent>,
        shutdown: S,
        mut on_outcome: F,
    ) -> Vec<Outcome>
    where
        S: Future<Output = ()>,
        F: FnMut(&Outcome),
    {
        tokio::pin!(shutdown);
        let mut all = Vec::new();

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    tracing::info!("shutdown requested, leaving watch loop");
                    break;
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        tracing::info!("change events closed, leaving watch loop");
                        break;
                    };
                    for outcome in self.handle(&event).await {
                        on_outcome(&outcome);
                        all.push(outcome);
                    }
                }
            }
        }

        events.close();
        all
    }
}
