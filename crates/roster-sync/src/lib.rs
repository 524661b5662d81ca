//! Player synchronization and presence tracking core.
//!
//! Reconciles the partially-overlapping CFTools profile payloads into
//! canonical roster records, keeps the database current, and runs the
//! two-speed background tracker over the watch-list.

pub mod normalize;
pub mod payload;
pub mod sync;
pub mod tracker;

pub use sync::{MAX_SEARCH_RESULTS, SyncService};
pub use tracker::{Tracker, TrackerConfig};

/// Unified error type for the roster-sync crate.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("CFTools request failed: {0}")]
    Client(#[from] cftools_client::CfError),

    #[error("database error: {0}")]
    Db(#[from] roster_db::DbError),
}
