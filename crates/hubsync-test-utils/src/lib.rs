//! Shared test utilities for the hubsync workspace.
//!
//! Dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`package`]: [`TestPackage`] builder for a workspace with one package
//! - [`remote`]: [`FakeRemote`], an in-memory hub with request counters

pub mod package;
pub mod remote;

pub use package::TestPackage;
pub use remote::{FakeFailure, FakeRemote};
