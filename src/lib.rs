pub mod config;
pub mod error;
pub mod models;
pub mod github;
pub mod analysis;

pub use config::{Config, PipelineConfig};
pub use error::{Error, Result};
pub use github::{GitHubClient, SavedSnapshotSource, SnapshotRequest, SnapshotSource};
pub use analysis::{StatsEngine, StatsLimits, WrappedPipeline};
