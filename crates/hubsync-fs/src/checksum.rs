//! SHA-256 checksums of source content
//!
//! Sync decisions compare content byte-for-byte; checksums only label
//! content in logs and status listings.

use sha2::{Digest, Sha256};

const PREFIX: &str = "sha256:";

/// Compute the checksum of string content as `"sha256:<hex>"`.
pub fn compute_content_checksum(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// First 12 hex digits of the checksum, for compact display.
pub fn short_checksum(content: &str) -> String {
    let full = compute_content_checksum(content);
    full[PREFIX.len()..PREFIX.len() + 12].to_string()
}
