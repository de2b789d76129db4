//! Aggregation engine and the statistics error taxonomy.

pub mod aggregate;

pub use self::aggregate::{
    Aggregation, BucketSeries, Dimension, FeedSeriesSet, Scope, aggregate_by_hour,
    aggregate_by_weekday, monday_first,
};

use thiserror::Error;

/// The two failure classes of this subsystem. Each entrypoint fails or
/// succeeds independently per invocation; there are no retries.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The statistics store cannot be reached. Fatal to the current
    /// record or report call; committed rows are unaffected since every
    /// write is a single-row commit.
    #[error("statistics store unavailable: {0}")]
    StorageUnavailable(String),

    /// A required collaborator is absent. Fatal to report generation
    /// only; recording is unaffected.
    #[error("missing dependency: {0}")]
    MissingDependency(String),
}
