//! [`FakeRemote`]: an in-memory hub.
//!
//! Stores resources per kind, assigns ids on create, bumps versions on
//! update and counts every call, so tests can assert both the resulting
//! state and which requests were made.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use async_trait::async_trait;
use hubsync_remote::{
    Error, ListingEntry, Remote, ResourceId, ResourceInfo, ResourceKind, Result, UpsertResponse,
};

/// A scripted failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeFailure {
    /// The hub cannot be reached (surfaces as a 503)
    Unavailable,
    /// The hub answers with an unparseable body
    Malformed,
    /// The write reaches the hub but is rejected with this message
    Rejected(String),
}

impl FakeFailure {
    fn into_error(self, url: String) -> Error {
        match self {
            Self::Unavailable | Self::Rejected(_) => Error::Status { url, status: 503 },
            Self::Malformed => Error::MalformedResponse {
                url,
                message: "expected value at line 1 column 1".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone)]
struct Stored {
    name: String,
    source: String,
    version: u64,
}

#[derive(Debug, Default)]
struct State {
    resources: HashMap<ResourceKind, BTreeMap<String, Stored>>,
    next_id: u64,
    /// Failure applied to every call
    failure: Option<FakeFailure>,
    /// Failures applied to calls for one id
    id_failures: HashMap<String, FakeFailure>,
    fetches: usize,
    upserts: usize,
    lists: HashMap<ResourceKind, usize>,
}

/// In-memory [`Remote`].
#[derive(Debug)]
pub struct FakeRemote {
    state: Mutex<State>,
}

impl Default for FakeRemote {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeRemote {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 100,
                ..State::default()
            }),
        }
    }

    /// Seed a resource at version 1. `name` is the hub's display name,
    /// vendor prefix included.
    pub fn insert(&self, kind: ResourceKind, id: &str, name: &str, source: &str) -> ResourceId {
        let mut state = self.state.lock().unwrap();
        state.resources.entry(kind).or_default().insert(
            id.to_string(),
            Stored {
                name: name.to_string(),
                source: source.to_string(),
                version: 1,
            },
        );
        ResourceId::new(id)
    }

    /// Id the next create will assign.
    pub fn set_next_id(&self, id: u64) {
        self.state.lock().unwrap().next_id = id;
    }

    /// Fail every call from now on; `None` clears it.
    pub fn fail_all(&self, failure: Option<FakeFailure>) {
        self.state.lock().unwrap().failure = failure;
    }

    /// Fail calls addressed to `id`.
    pub fn fail_id(&self, id: &str, failure: FakeFailure) {
        self.state
            .lock()
            .unwrap()
            .id_failures
            .insert(id.to_string(), failure);
    }

    pub fn source_of(&self, kind: ResourceKind, id: &str) -> Option<String> {
        self.stored(kind, id).map(|s| s.source)
    }

    pub fn version_of(&self, kind: ResourceKind, id: &str) -> Option<u64> {
        self.stored(kind, id).map(|s| s.version)
    }

    /// Number of resources of `kind`.
    pub fn count(&self, kind: ResourceKind) -> usize {
        self.state
            .lock()
            .unwrap()
            .resources
            .get(&kind)
            .map_or(0, BTreeMap::len)
    }

    /// `fetch_info` calls that would have reached the network.
    pub fn fetch_calls(&self) -> usize {
        self.state.lock().unwrap().fetches
    }

    pub fn upsert_calls(&self) -> usize {
        self.state.lock().unwrap().upserts
    }

    pub fn list_calls(&self, kind: ResourceKind) -> usize {
        self.state
            .lock()
            .unwrap()
            .lists
            .get(&kind)
            .copied()
            .unwrap_or(0)
    }

    /// Every request of any kind.
    pub fn total_calls(&self) -> usize {
        let state = self.state.lock().unwrap();
        state.fetches + state.upserts + state.lists.values().sum::<usize>()
    }

    fn stored(&self, kind: ResourceKind, id: &str) -> Option<Stored> {
        self.state
            .lock()
            .unwrap()
            .resources
            .get(&kind)
            .and_then(|r| r.get(id))
            .cloned()
    }
}

fn url(kind: ResourceKind, action: &str) -> String {
    format!("fake://hub/{}/{}", kind.path_segment(), action)
}

#[async_trait]
impl Remote for FakeRemote {
    async fn fetch_info(
        &self,
        kind: ResourceKind,
        id: Option<&ResourceId>,
    ) -> Result<Option<ResourceInfo>> {
        let Some(id) = id else {
            return Ok(None);
        };

        let mut state = self.state.lock().unwrap();
        state.fetches += 1;

        let failure = state
            .failure
            .clone()
            .or_else(|| state.id_failures.get(id.as_str()).cloned());
        match failure {
            Some(FakeFailure::Rejected(_)) | None => {}
            Some(failure) => return Err(failure.into_error(url(kind, "ajax/code"))),
        }

        let stored = state
            .resources
            .get(&kind)
            .and_then(|r| r.get(id.as_str()))
            .ok_or_else(|| Error::Status {
                url: url(kind, "ajax/code"),
                status: 404,
            })?;

        Ok(Some(ResourceInfo {
            id: id.clone(),
            name: Some(stored.name.clone()),
            version: Some(stored.version),
            source: Some(stored.source.clone()),
            status: None,
        }))
    }

    async fn upsert(
        &self,
        kind: ResourceKind,
        id: Option<&ResourceId>,
        source: &str,
        version: Option<u64>,
    ) -> Result<UpsertResponse> {
        let mut state = self.state.lock().unwrap();
        state.upserts += 1;

        let failure = state.failure.clone().or_else(|| {
            id.and_then(|id| state.id_failures.get(id.as_str()).cloned())
        });
        match failure {
            None => {}
            Some(FakeFailure::Rejected(message)) => {
                return Ok(UpsertResponse {
                    id: id.cloned(),
                    name: None,
                    version,
                    status: UpsertResponse::STATUS_ERROR.to_string(),
                    error_message: Some(message),
                    status_code: 200,
                });
            }
            Some(failure) => return Err(failure.into_error(url(kind, "save"))),
        }

        let Some(id) = id else {
            let new_id = state.next_id.to_string();
            state.next_id += 1;
            state.resources.entry(kind).or_default().insert(
                new_id.clone(),
                Stored {
                    name: String::new(),
                    source: source.to_string(),
                    version: 1,
                },
            );
            return Ok(UpsertResponse {
                id: Some(ResourceId::new(new_id)),
                name: None,
                version: Some(1),
                status: "success".to_string(),
                error_message: None,
                status_code: 302,
            });
        };

        let Some(stored) = state
            .resources
            .get_mut(&kind)
            .and_then(|r| r.get_mut(id.as_str()))
        else {
            return Ok(UpsertResponse {
                id: Some(id.clone()),
                name: None,
                version,
                status: UpsertResponse::STATUS_ERROR.to_string(),
                error_message: Some(format!("{} {} does not exist", kind, id)),
                status_code: 200,
            });
        };

        if version.is_some_and(|v| v != stored.version) {
            return Ok(UpsertResponse {
                id: Some(id.clone()),
                name: Some(stored.name.clone()),
                version: Some(stored.version),
                status: UpsertResponse::STATUS_ERROR.to_string(),
                error_message: Some("Version mismatch".to_string()),
                status_code: 200,
            });
        }

        stored.source = source.to_string();
        stored.version += 1;
        Ok(UpsertResponse {
            id: Some(id.clone()),
            name: Some(stored.name.clone()),
            version: Some(stored.version),
            status: "success".to_string(),
            error_message: None,
            status_code: 200,
        })
    }

    async fn list(&self, kind: ResourceKind) -> Result<Vec<ListingEntry>> {
        let mut state = self.state.lock().unwrap();
        *state.lists.entry(kind).or_default() += 1;

        match state.failure.clone() {
            Some(FakeFailure::Rejected(_)) | None => {}
            Some(failure) => return Err(failure.into_error(url(kind, "list/data"))),
        }

        Ok(state
            .resources
            .get(&kind)
            .map(|resources| {
                resources
                    .iter()
                    .map(|(id, stored)| ListingEntry {
                        id: ResourceId::new(id.as_str()),
                        name: stored.name.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}
