//! Remote resource client for hubsync
//!
//! Talks to the hub's code endpoints for the two kinds of hosted code:
//!
//! - [`Remote`]: the read/write seam the sync engine is written against
//! - [`HubClient`]: the HTTP implementation of [`Remote`]
//! - [`Directory`]: per-run cache of the hub's listings, resolving local
//!   file names to remote ids

pub mod client;
pub mod directory;
pub mod error;
pub mod kind;
pub mod types;

pub use client::{HubClient, Remote, normalize_base_url};
pub use directory::{Directory, normalize_name};
pub use error::{Error, Result};
pub use kind::ResourceKind;
pub use types::{ListingEntry, ResourceId, ResourceInfo, UpsertResponse};
