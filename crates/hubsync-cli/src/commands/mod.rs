//! Command implementations for hubsync-cli

pub mod open;
pub mod status;
pub mod sync;

pub use open::run_open;
pub use status::run_status;
pub use sync::run_sync;
