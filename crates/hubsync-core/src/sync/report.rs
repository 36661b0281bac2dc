//! Outcome types for sync runs

use serde::Serialize;

use hubsync_fs::NormalizedPath;
use hubsync_remote::{ResourceId, ResourceKind};

use crate::{Direction, Error, FailureKind, FileRecord};

/// Why a record was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Local and remote content are identical
    Unchanged,
    /// Nothing to retrieve: the resource does not exist on the hub
    NotOnRemote,
}

/// Terminal state of one record's sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeStatus {
    Skipped { reason: SkipReason },
    Updated,
    Failed { failure: FailureKind, message: String },
}

/// What happened to one record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub path: NormalizedPath,
    pub kind: ResourceKind,
    pub remote_id: Option<ResourceId>,
    /// Display name on the hub, when known
    pub name: Option<String>,
    /// Remote version before the sync
    pub previous_version: Option<u64>,
    /// Remote version after the sync
    pub version: Option<u64>,
    /// HTTP status of the write, for uploads that reached the hub
    pub status_code: Option<u16>,
    /// True when the upload created the resource
    pub created: bool,
    #[serde(flatten)]
    pub status: OutcomeStatus,
}

impl Outcome {
    pub(crate) fn for_record(record: &FileRecord) -> Self {
        Self {
            path: record.local_path.clone(),
            kind: record.kind,
            remote_id: record.remote_id.clone(),
            name: None,
            previous_version: None,
            version: None,
            status_code: None,
            created: false,
            status: OutcomeStatus::Skipped {
                reason: SkipReason::Unchanged,
            },
        }
    }

    pub(crate) fn skipped(mut self, reason: SkipReason) -> Self {
        self.status = OutcomeStatus::Skipped { reason };
        self
    }

    pub(crate) fn updated(mut self) -> Self {
        self.status = OutcomeStatus::Updated;
        self
    }

    pub(crate) fn failed(mut self, error: &Error) -> Self {
        let failure = error
            .failure_kind()
            .unwrap_or(FailureKind::RemoteUnavailable);
        self.status = OutcomeStatus::Failed {
            failure,
            message: error.to_string(),
        };
        self
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, OutcomeStatus::Skipped { .. })
    }

    pub fn is_updated(&self) -> bool {
        matches!(self.status, OutcomeStatus::Updated)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, OutcomeStatus::Failed { .. })
    }

    /// `"<id> <name>"`, leaving out whichever is unknown.
    pub fn display_name(&self) -> String {
        [
            self.remote_id.as_ref().map(ToString::to_string),
            self.name.clone(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Outcomes of a bulk run, one per record
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub direction: Direction,
    pub outcomes: Vec<Outcome>,
}

impl SyncReport {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            outcomes: Vec::new(),
        }
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_skipped()).count()
    }

    pub fn updated(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_updated()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }

    /// True when no record failed.
    pub fn success(&self) -> bool {
        self.failed() == 0
    }
}
