use async_trait::async_trait;
use std::path::PathBuf;

use crate::error::Result;
use crate::github::query::{parse_saved_snapshot, SnapshotRequest};
use crate::models::UserNode;

/// Anything that can produce the raw activity record for one user and year.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_snapshot(&self, request: &SnapshotRequest) -> Result<UserNode>;
    fn name(&self) -> &str;
}

/// Serves a previously saved GraphQL response from disk.
pub struct SavedSnapshotSource {
    path: PathBuf,
}

impl SavedSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for SavedSnapshotSource {
    async fn fetch_snapshot(&self, request: &SnapshotRequest) -> Result<UserNode> {
        tracing::debug!("Reading {} snapshot from {}", request.login, self.path.display());
        let body = tokio::fs::read_to_string(&self.path).await?;
        parse_saved_snapshot(&body)
    }

    fn name(&self) -> &str {
        "saved-snapshot"
    }
}
