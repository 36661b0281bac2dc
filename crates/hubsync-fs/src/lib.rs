//! Local filesystem surface for hubsync
//!
//! Path normalization, reading and writing tracked source files,
//! content checksums, and format-agnostic config loading.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use checksum::{compute_content_checksum, short_checksum};
pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::NormalizedPath;
