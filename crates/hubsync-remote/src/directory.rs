//! Name-to-id resolution against the hub's listings

use std::collections::HashMap;

use crate::{ListingEntry, Remote, ResourceId, ResourceKind, Result};

/// Normalize a display or file name for matching.
///
/// Strips `vendor_prefix` from the front and removes all whitespace, so
/// `"FLO Smart Shutoff"` and `"SmartShutoff"` compare equal.
pub fn normalize_name(name: &str, vendor_prefix: &str) -> String {
    let trimmed = name.trim();
    let without_prefix = if vendor_prefix.trim().is_empty() {
        trimmed
    } else {
        trimmed.strip_prefix(vendor_prefix).unwrap_or(trimmed)
    };
    without_prefix.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Per-run cache of listings, one fetch per kind.
///
/// Built fresh for every run and dropped with it; listings are not
/// trusted across runs.
#[derive(Debug, Default)]
pub struct Directory {
    vendor_prefix: String,
    listings: HashMap<ResourceKind, Vec<ListingEntry>>,
}

impl Directory {
    pub fn new(vendor_prefix: impl Into<String>) -> Self {
        Self {
            vendor_prefix: vendor_prefix.into(),
            listings: HashMap::new(),
        }
    }

    /// Resolve a local file stem to the id of the matching remote resource.
    ///
    /// `Ok(None)` means nothing on the hub carries that name yet, which is
    /// the normal state of a file that has never been uploaded.
    pub async fn resolve_id_by_name<R: Remote + ?Sized>(
        &mut self,
        remote: &R,
        name: &str,
        kind: ResourceKind,
    ) -> Result<Option<ResourceId>> {
        let wanted = normalize_name(name, &self.vendor_prefix);
        let vendor_prefix = self.vendor_prefix.clone();
        let listing = self.listing(remote, kind).await?;

        let mut matches = listing
            .iter()
            .filter(|entry| normalize_name(&entry.name, &vendor_prefix) == wanted);

        let Some(first) = matches.next() else {
            tracing::debug!(%kind, name, "no listing entry matches");
            return Ok(None);
        };

        let extra: Vec<&ResourceId> = matches.map(|entry| &entry.id).collect();
        if !extra.is_empty() {
            tracing::warn!(
                %kind,
                name,
                chosen = %first.id,
                ignored = ?extra,
                "several listing entries match; using the first"
            );
        }

        Ok(Some(first.id.clone()))
    }

    async fn listing<R: Remote + ?Sized>(
        &mut self,
        remote: &R,
        kind: ResourceKind,
    ) -> Result<&[ListingEntry]> {
        if !self.listings.contains_key(&kind) {
            let entries = remote.list(kind).await?;
            tracing::debug!(%kind, count = entries.len(), "cached listing");
            self.listings.insert(kind, entries);
        }
        Ok(self.listings.get(&kind).map(Vec::as_slice).unwrap_or_default())
    }
}
