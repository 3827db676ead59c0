pub mod calendar;
pub mod engine;
pub mod languages;
pub mod ordered;
pub mod pipeline;
pub mod streaks;

pub use engine::{StatsEngine, StatsLimits};
pub use pipeline::WrappedPipeline;
