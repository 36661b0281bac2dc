//! The [`Remote`] seam and its HTTP implementation

use async_trait::async_trait;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::types::UpdateBody;
use crate::{Error, ListingEntry, ResourceId, ResourceInfo, ResourceKind, Result, UpsertResponse};

/// Reads and writes remote code resources.
///
/// The sync engine only talks to the hub through this trait, so tests can
/// substitute an in-memory implementation.
#[async_trait]
pub trait Remote: Send + Sync {
    /// Fetch metadata and source for a resource.
    ///
    /// Returns `Ok(None)` without touching the network when `id` is absent:
    /// a resource that was never created cannot be queried.
    async fn fetch_info(
        &self,
        kind: ResourceKind,
        id: Option<&ResourceId>,
    ) -> Result<Option<ResourceInfo>>;

    /// Create (`id` absent) or update (`id` present) a resource.
    ///
    /// Transport failures are errors; a server that rejects the write is
    /// reported through [`UpsertResponse::is_error`].
    async fn upsert(
        &self,
        kind: ResourceKind,
        id: Option<&ResourceId>,
        source: &str,
        version: Option<u64>,
    ) -> Result<UpsertResponse>;

    /// Fetch the listing of every resource of a kind.
    async fn list(&self, kind: ResourceKind) -> Result<Vec<ListingEntry>>;
}

/// Normalize a configured host into a base URL.
///
/// A bare host or IP gets `http://`; trailing slashes are removed.
pub fn normalize_base_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.contains("://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    }
}

/// HTTP client for a single hub.
#[derive(Clone, Debug)]
pub struct HubClient {
    client: Client,
    base_url: String,
}

impl HubClient {
    /// Create a client for the hub at `host`.
    ///
    /// Redirects are not followed: a create answers with a redirect whose
    /// target carries the new id.
    pub fn new(host: &str) -> Result<Self> {
        let client = Client::builder().redirect(Policy::none()).build()?;
        Ok(Self {
            client,
            base_url: normalize_base_url(host),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the hub's code editor for a resource.
    pub fn editor_url(&self, kind: ResourceKind, id: &ResourceId) -> String {
        format!("{}/{}/editor/{}", self.base_url, kind.path_segment(), id)
    }

    fn url(&self, kind: ResourceKind, endpoint: &str) -> String {
        format!("{}/{}/{}", self.base_url, kind.path_segment(), endpoint)
    }

    async fn read_json<T: DeserializeOwned>(url: &str, response: Response) -> Result<T> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| Error::MalformedResponse {
            url: url.to_string(),
            message: e.to_string(),
        })
    }

    async fn update(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        source: &str,
        version: Option<u64>,
    ) -> Result<UpsertResponse> {
        let url = self.url(kind, "ajax/update");
        let version = version.map(|v| v.to_string()).unwrap_or_default();
        let form = [
            ("id", id.as_str()),
            ("source", source),
            ("version", version.as_str()),
        ];

        tracing::debug!(%url, %id, version = %version, "updating resource");
        let response = self.client.post(&url).form(&form).send().await?;
        let status_code = response.status().as_u16();

        if !response.status().is_success() {
            return Ok(UpsertResponse::rejected(
                status_code,
                format!("HTTP {}", status_code),
            ));
        }

        let body: UpdateBody = Self::read_json(&url, response).await?;
        Ok(UpsertResponse {
            id: body.id.or_else(|| Some(id.clone())),
            name: None,
            version: body.version,
            status: body.status.unwrap_or_else(|| "success".to_string()),
            error_message: body.error_message,
            status_code,
        })
    }

    async fn create(&self, kind: ResourceKind, source: &str) -> Result<UpsertResponse> {
        let url = self.url(kind, "save");
        let form = [("id", ""), ("version", ""), ("source", source)];

        tracing::debug!(%url, "creating resource");
        let response = self.client.post(&url).form(&form).send().await?;
        let status = response.status();
        let status_code = status.as_u16();

        if !(status.is_success() || status.is_redirection()) {
            return Ok(UpsertResponse::rejected(
                status_code,
                format!("HTTP {}", status_code),
            ));
        }

        let new_id = response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .and_then(id_from_location);

        let Some(new_id) = new_id else {
            return Ok(UpsertResponse::rejected(
                status_code,
                "create response carried no resource id",
            ));
        };

        let mut result = UpsertResponse {
            id: Some(new_id.clone()),
            name: None,
            version: None,
            status: "success".to_string(),
            error_message: None,
            status_code,
        };

        // The id is already assigned; a failed follow-up read only costs
        // the name and version in the report.
        match self.fetch_info(kind, Some(&new_id)).await {
            Ok(Some(info)) => {
                result.name = info.name;
                result.version = info.version;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(id = %new_id, error = %e, "could not read back created resource");
            }
        }

        Ok(result)
    }
}

/// Last path segment of a redirect target, ignoring any query string.
fn id_from_location(location: &str) -> Option<ResourceId> {
    let path = location.split(['?', '#']).next()?;
    let segment = path.trim_end_matches('/').rsplit('/').next()?;
    if segment.is_empty() {
        None
    } else {
        Some(ResourceId::new(segment))
    }
}

#[async_trait]
impl Remote for HubClient {
    async fn fetch_info(
        &self,
        kind: ResourceKind,
        id: Option<&ResourceId>,
    ) -> Result<Option<ResourceInfo>> {
        let Some(id) = id else {
            return Ok(None);
        };

        let url = self.url(kind, "ajax/code");
        tracing::debug!(%url, %id, "fetching resource info");
        let response = self
            .client
            .get(&url)
            .query(&[("id", id.as_str())])
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(Some(Self::read_json(&url, response).await?)),
            status => Err(Error::Status {
                url,
                status: status.as_u16(),
            }),
        }
    }

    async fn upsert(
        &self,
        kind: ResourceKind,
        id: Option<&ResourceId>,
        source: &str,
        version: Option<u64>,
    ) -> Result<UpsertResponse> {
        match id {
            Some(id) => self.update(kind, id, source, version).await,
            None => self.create(kind, source).await,
        }
    }

    /// `GET /{kind}/{listing_endpoint}`, see
    /// [`ResourceKind::listing_endpoint`]. The HTML `/{kind}/list` page is
    /// never scraped.
    async fn list(&self, kind: ResourceKind) -> Result<Vec<ListingEntry>> {
        let url = self.url(kind, kind.listing_endpoint());
        tracing::debug!(%url, "fetching listing");
        let response = self.client.get(&url).send().await?;

        match response.status() {
            StatusCode::OK => Self::read_json(&url, response).await,
            status => Err(Error::Status {
                url,
                status: status.as_u16(),
            }),
        }
    }
}
