pub mod client;
pub mod query;
pub mod source;

pub use client::GitHubClient;
pub use query::{parse_saved_snapshot, SnapshotRequest};
pub use source::{SavedSnapshotSource, SnapshotSource};
