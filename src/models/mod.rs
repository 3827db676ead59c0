pub mod snapshot;
pub mod stats;

pub use snapshot::*;
pub use stats::*;
