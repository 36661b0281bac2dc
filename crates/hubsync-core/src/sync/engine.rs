//! SyncEngine implementation
//!
//! Every decision is made against freshly fetched remote state, and every
//! failure stays with the record that caused it.

use hubsync_fs::{io, short_checksum};
use hubsync_remote::Remote;

use crate::{Direction, Error, FileRecord, Manifest};

use super::report::{Outcome, SkipReason, SyncReport};

/// Engine for synchronizing records with the hub
///
/// Records are processed one at a time, in manifest order.
pub struct SyncEngine<'a, R: Remote + ?Sized> {
    remote: &'a R,
}

impl<'a, R: Remote + ?Sized> SyncEngine<'a, R> {
    pub fn new(remote: &'a R) -> Self {
        Self { remote }
    }

    /// Push local content to the hub.
    ///
    /// Skips when the hub already holds identical content. Otherwise
    /// updates, or creates when the record has no remote id; a successful
    /// create stores the new id on `record`.
    pub async fn sync_up(&self, record: &mut FileRecord) -> Outcome {
        let outcome = Outcome::for_record(record);

        let local = match io::read_text(&record.local_path) {
            Ok(content) => content,
            Err(source) => {
                let error = Error::LocalFileUnreadable {
                    path: record.local_path.clone(),
                    source,
                };
                tracing::warn!(path = %record.local_path, error = %error, "upload failed");
                return outcome.failed(&error);
            }
        };

        let info = match self
            .remote
            .fetch_info(record.kind, record.remote_id.as_ref())
            .await
        {
            Ok(info) => info,
            Err(e) => {
                let error = Error::from(e);
                tracing::warn!(path = %record.local_path, error = %error, "upload failed");
                return outcome.failed(&error);
            }
        };

        let mut outcome = outcome;
        let previous_version = info.as_ref().and_then(|i| i.version);
        outcome.previous_version = previous_version;
        outcome.version = previous_version;
        outcome.name = info.as_ref().and_then(|i| i.name.clone());

        let remote_source = info.as_ref().and_then(|i| i.source.as_deref());
        if remote_source == Some(local.as_str()) {
            tracing::info!(path = %record.local_path, kind = %record.kind, "unchanged, skipped");
            return outcome.skipped(SkipReason::Unchanged);
        }

        tracing::info!(
            path = %record.local_path,
            kind = %record.kind,
            id = ?record.remote_id,
            local = %short_checksum(&local),
            version = ?previous_version,
            "uploading"
        );

        let response = match self
            .remote
            .upsert(
                record.kind,
                record.remote_id.as_ref(),
                &local,
                previous_version,
            )
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let error = Error::from(e);
                tracing::warn!(path = %record.local_path, error = %error, "upload failed");
                return outcome.failed(&error);
            }
        };

        outcome.status_code = Some(response.status_code);
        outcome.version = response.version.or(outcome.version);
        if response.name.is_some() {
            outcome.name = response.name.clone();
        }

        if response.is_error() {
            let error = Error::RemoteReportedError {
                message: response
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "hub reported an error".to_string()),
            };
            tracing::warn!(path = %record.local_path, error = %error, "hub rejected upload");
            return outcome.failed(&error);
        }

        if record.remote_id.is_none() {
            let Some(new_id) = response.id.clone() else {
                let error = Error::RemoteMalformedResponse {
                    message: "create succeeded without returning an id".to_string(),
                };
                tracing::warn!(path = %record.local_path, error = %error, "upload failed");
                return outcome.failed(&error);
            };
            tracing::info!(path = %record.local_path, id = %new_id, "created on hub");
            record.remote_id = Some(new_id.clone());
            outcome.remote_id = Some(new_id);
            outcome.created = true;
        }

        outcome.updated()
    }

    /// Pull remote content into the local file.
    ///
    /// A record without a remote id is skipped without any request.
    /// A missing local file is written; an identical one is left alone.
    pub async fn sync_down(&self, record: &FileRecord) -> Outcome {
        let outcome = Outcome::for_record(record);

        if record.remote_id.is_none() {
            tracing::info!(path = %record.local_path, kind = %record.kind, "not on hub, skipped");
            return outcome.skipped(SkipReason::NotOnRemote);
        }

        let info = match self
            .remote
            .fetch_info(record.kind, record.remote_id.as_ref())
            .await
        {
            Ok(Some(info)) => info,
            Ok(None) => return outcome.skipped(SkipReason::NotOnRemote),
            Err(e) => {
                let error = Error::from(e);
                tracing::warn!(path = %record.local_path, error = %error, "retrieve failed");
                return outcome.failed(&error);
            }
        };

        let mut outcome = outcome;
        outcome.name = info.name.clone();
        outcome.previous_version = info.version;
        outcome.version = info.version;

        let Some(remote_source) = info.source.as_deref() else {
            let error = Error::RemoteMalformedResponse {
                message: format!("resource {} carried no source", info.id),
            };
            tracing::warn!(path = %record.local_path, error = %error, "retrieve failed");
            return outcome.failed(&error);
        };

        let local = match io::read_text_if_exists(&record.local_path) {
            Ok(local) => local,
            Err(source) => {
                let error = Error::LocalFileUnreadable {
                    path: record.local_path.clone(),
                    source,
                };
                tracing::warn!(path = %record.local_path, error = %error, "retrieve failed");
                return outcome.failed(&error);
            }
        };

        if local.as_deref() == Some(remote_source) {
            tracing::info!(path = %record.local_path, kind = %record.kind, "unchanged, skipped");
            return outcome.skipped(SkipReason::Unchanged);
        }

        tracing::info!(
            path = %record.local_path,
            kind = %record.kind,
            version = ?info.version,
            remote = %short_checksum(remote_source),
            "retrieving"
        );

        if let Err(source) = io::write_text(&record.local_path, remote_source) {
            let error = Error::LocalFileUnwritable {
                path: record.local_path.clone(),
                source,
            };
            tracing::warn!(path = %record.local_path, error = %error, "retrieve failed");
            return outcome.failed(&error);
        }

        outcome.updated()
    }

    /// Sync every record in `manifest`, in order.
    pub async fn sync_all(&self, manifest: &mut Manifest, direction: Direction) -> SyncReport {
        self.sync_all_with(manifest, direction, |_| {}).await
    }

    /// Like [`sync_all`](Self::sync_all), calling `on_outcome` as each
    /// record finishes.
    pub async fn sync_all_with<F>(
        &self,
        manifest: &mut Manifest,
        direction: Direction,
        mut on_outcome: F,
    ) -> SyncReport
    where
        F: FnMut(&Outcome),
    {
        tracing::info!(%direction, records = manifest.len(), "starting sync");
        let mut report = SyncReport::new(direction);

        for record in manifest.records_mut() {
            let outcome = match direction {
                Direction::Upload => self.sync_up(record).await,
                Direction::Retrieve => self.sync_down(record).await,
            };
            on_outcome(&outcome);
            report.outcomes.push(outcome);
        }

        tracing::info!(
            updated = report.updated(),
            skipped = report.skipped(),
            failed = report.failed(),
            "sync finished"
        );
        report
    }
}
