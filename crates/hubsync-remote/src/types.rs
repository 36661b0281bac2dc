//! Wire types for the hub's code endpoints

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier the hub assigns to an app or driver.
///
/// The hub emits ids as JSON numbers in some places and strings in
/// others; both deserialize to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<u64> for ResourceId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match NumberOrString::deserialize(deserializer)? {
            NumberOrString::Number(n) => Self::from(n),
            NumberOrString::String(s) => Self(s),
        })
    }
}

/// Versions arrive as numbers, numeric strings, empty strings or null.
fn lenient_version<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    Ok(
        match Option::<NumberOrString>::deserialize(deserializer)? {
            Some(NumberOrString::Number(n)) => Some(n),
            Some(NumberOrString::String(s)) => s.trim().parse().ok(),
            None => None,
        },
    )
}

/// Metadata and source of one remote resource, from `/{kind}/ajax/code`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub id: ResourceId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_version")]
    pub version: Option<u64>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// One row of a kind's listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub id: ResourceId,
    #[serde(default)]
    pub name: String,
}

/// JSON body returned by `/{kind}/ajax/update`.
#[derive(Debug, Deserialize)]
pub(crate) struct UpdateBody {
    #[serde(default)]
    pub id: Option<ResourceId>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_version")]
    pub version: Option<u64>,
    #[serde(default, rename = "errorMessage")]
    pub error_message: Option<String>,
}

/// Result of a create or update.
///
/// A server-side rejection is reported here with `status == "error"`,
/// not as an [`Error`](crate::Error), so callers can record it and move on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpsertResponse {
    /// Id of the written resource; for a create, the newly assigned one
    pub id: Option<ResourceId>,
    pub name: Option<String>,
    pub version: Option<u64>,
    pub status: String,
    pub error_message: Option<String>,
    /// HTTP status code of the write request
    pub status_code: u16,
}

impl UpsertResponse {
    pub const STATUS_ERROR: &'static str = "error";

    pub fn is_error(&self) -> bool {
        self.status.eq_ignore_ascii_case(Self::STATUS_ERROR)
    }

    pub(crate) fn rejected(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            id: None,
            name: None,
            version: None,
            status: Self::STATUS_ERROR.to_string(),
            error_message: Some(message.into()),
            status_code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn resource_id_from_number_or_string() {
        let a: ResourceId = serde_json::from_value(json!(827)).unwrap();
        let b: ResourceId = serde_json::from_value(json!("827")).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str(), "827");
    }

    #[test]
    fn resource_info_tolerates_sparse_body() {
        let info: ResourceInfo = serde_json::from_value(json!({
            "id": 1604,
            "version": "12",
            "source": "metadata {}"
        }))
        .unwrap();

        assert_eq!(info.id, ResourceId::from(1604));
        assert_eq!(info.version, Some(12));
        assert_eq!(info.name, None);
        assert_eq!(info.source.as_deref(), Some("metadata {}"));
    }

    #[test]
    fn empty_version_is_none() {
        let info: ResourceInfo =
            serde_json::from_value(json!({"id": "5", "version": ""})).unwrap();
        assert_eq!(info.version, None);
    }

    #[test]
    fn update_body_reads_error_message() {
        let body: UpdateBody = serde_json::from_value(json!({
            "status": "error",
            "errorMessage": "syntax error\nline 3"
        }))
        .unwrap();
        assert_eq!(body.status.as_deref(), Some("error"));
        assert_eq!(body.error_message.as_deref(), Some("syntax error\nline 3"));
    }

    #[test]
    fn rejected_response_is_error() {
        let response = UpsertResponse::rejected(500, "HTTP 500");
        assert!(response.is_error());
        assert_eq!(response.status_code, 500);
    }
}
