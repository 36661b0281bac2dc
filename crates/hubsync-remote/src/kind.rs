//! Resource kinds hosted by the hub

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The two kinds of code the hub hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    App,
    Driver,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 2] = [ResourceKind::App, ResourceKind::Driver];

    /// URL path segment used by the hub (`/app/...`, `/driver/...`).
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::App => "app",
            Self::Driver => "driver",
        }
    }

    /// Endpoint, relative to [`path_segment`](Self::path_segment), that
    /// lists every resource of this kind as JSON `[{id, name}]`.
    ///
    /// The hub's `/{kind}/list` pages are HTML; only the JSON listing is
    /// consumed. Hubs that lack the JSON listing for a kind cannot resolve
    /// names for it.
    pub fn listing_endpoint(self) -> &'static str {
        match self {
            Self::App => "list/data",
            Self::Driver => "list/data",
        }
    }

    /// Local directory holding sources of this kind.
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::App => "apps",
            Self::Driver => "drivers",
        }
    }

    /// Map a local bucket directory name to its kind.
    ///
    /// The trailing plural `s` is optional; anything else is rejected.
    pub fn from_dir_name(name: &str) -> Result<Self> {
        let singular = name.strip_suffix('s').unwrap_or(name);
        match singular {
            "app" => Ok(Self::App),
            "driver" => Ok(Self::Driver),
            _ => Err(Error::UnknownKind {
                name: name.to_string(),
            }),
        }
    }

    fn title(self) -> &'static str {
        match self {
            Self::App => "App",
            Self::Driver => "Driver",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_dir_name(&s.to_ascii_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dir_names_round_trip() {
        for kind in ResourceKind::ALL {
            assert_eq!(ResourceKind::from_dir_name(kind.dir_name()).unwrap(), kind);
        }
    }

    #[test]
    fn listing_endpoint_is_json_listing() {
        for kind in ResourceKind::ALL {
            assert_eq!(kind.listing_endpoint(), "list/data");
        }
    }

    #[test]
    fn singular_names_accepted() {
        assert_eq!(ResourceKind::from_dir_name("app").unwrap(), ResourceKind::App);
        assert_eq!("Driver".parse::<ResourceKind>().unwrap(), ResourceKind::Driver);
    }

    #[test]
    fn unknown_directory_rejected() {
        let err = ResourceKind::from_dir_name("libraries").unwrap_err();
        assert!(matches!(err, Error::UnknownKind { ref name } if name == "libraries"));
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ResourceKind::Driver).unwrap(), "\"driver\"");
    }
}
