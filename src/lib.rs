// src/lib.rs
// Public library surface for the CLI and integration tests.

pub mod config;
pub mod manager;
pub mod merge;
pub mod metrics;
pub mod sources;

// ---- Re-exports for stable public API ----
pub use crate::manager::{PlayerIds, PlayerInfoManager};
pub use crate::merge::{merge, merge_with, MergeNotice, MergedProfile};
pub use crate::sources::types::{GeneralField, RecordData, SourceAdapter, SourceRecord};
pub use crate::sources::SourceKey;
