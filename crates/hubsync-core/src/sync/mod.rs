//! Per-file synchronization between the package and the hub
//!
//! - **engine**: compare, decide and act for one record or a whole manifest
//! - **report**: outcomes and the per-run report

mod engine;
mod report;

pub use engine::SyncEngine;
pub use report::{Outcome, OutcomeStatus, SkipReason, SyncReport};
