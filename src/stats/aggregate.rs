//! Bucketed aggregation of recorded run outcomes.
//!
//! Two fixed time dimensions: hour of day (24 buckets) and day of week
//! (7 buckets, Monday-first). Aggregates are recomputed in full from a
//! single ordered store scan on every call; nothing is cached.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};

use crate::storage::{self, Pool, RunOutcome};
use crate::stats::StatsError;

/// Raw day-of-week numbering used by historical databases: 0=Sunday
/// through 6=Saturday. New code never exposes this ordering directly;
/// see [`monday_first`].
pub const RAW_WEEKDAY_SUNDAY: u32 = 0;

/// Whether an aggregation is computed globally or broken out per feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    All,
    PerFeed,
}

/// A fixed bucket domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    HourOfDay,
    Weekday,
}

impl Dimension {
    pub fn bucket_count(&self) -> usize {
        match self {
            Dimension::HourOfDay => 24,
            Dimension::Weekday => 7,
        }
    }

    /// Axis labels, one per bucket.
    pub fn labels(&self) -> Vec<String> {
        match self {
            Dimension::HourOfDay => (0..24).map(|h| h.to_string()).collect(),
            Dimension::Weekday => ["mon", "tue", "wed", "thu", "fri", "sat", "sun"]
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

/// One aggregate value per bucket, covering the whole domain. Buckets
/// with no data hold 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketSeries {
    pub dimension: Dimension,
    pub values: Vec<u64>,
}

impl BucketSeries {
    fn zeroed(dimension: Dimension) -> Self {
        Self {
            dimension,
            values: vec![0; dimension.bucket_count()],
        }
    }

    pub fn max_value(&self) -> u64 {
        self.values.iter().copied().max().unwrap_or(0)
    }
}

/// Per-feed series over one shared domain. `legend` holds feed names in
/// first-seen scan order; `series[i]` belongs to `legend[i]`, which also
/// fixes its palette index (`i mod 14`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSeriesSet {
    pub dimension: Dimension,
    pub legend: Vec<String>,
    pub series: Vec<BucketSeries>,
}

impl FeedSeriesSet {
    pub fn max_value(&self) -> u64 {
        self.series.iter().map(BucketSeries::max_value).max().unwrap_or(0)
    }
}

/// Result of an aggregation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Aggregation {
    Global(BucketSeries),
    PerFeed(FeedSeriesSet),
}

impl Aggregation {
    pub fn max_value(&self) -> u64 {
        match self {
            Aggregation::Global(series) => series.max_value(),
            Aggregation::PerFeed(set) => set.max_value(),
        }
    }
}

/// Remap the raw store weekday convention (0=Sunday..6=Saturday) onto
/// Monday-first buckets: `mapped = (raw - 1) mod 7`, so raw 0 (Sunday)
/// lands in bucket 6 and raw 1 (Monday) in bucket 0.
pub fn monday_first(raw: u32) -> u32 {
    (raw + 6) % 7
}

fn bucket_of<Tz: TimeZone>(timestamp: DateTime<Utc>, dimension: Dimension, tz: &Tz) -> usize {
    let local = timestamp.with_timezone(tz);
    match dimension {
        Dimension::HourOfDay => local.hour() as usize,
        Dimension::Weekday => {
            // chrono reports the same raw convention historical
            // databases use (RAW_WEEKDAY_SUNDAY = 0).
            let raw = local.weekday().num_days_from_sunday();
            debug_assert!(raw < 7);
            monday_first(raw) as usize
        }
    }
}

/// Sum `success` per bucket across all feeds.
pub(crate) fn fold_global<Tz: TimeZone>(
    outcomes: &[RunOutcome],
    dimension: Dimension,
    tz: &Tz,
) -> BucketSeries {
    let mut series = BucketSeries::zeroed(dimension);
    for outcome in outcomes {
        let bucket = bucket_of(outcome.timestamp, dimension, tz);
        series.values[bucket] += outcome.success;
    }
    series
}

/// Sum `success` per bucket and per feed. Feeds enter the legend in the
/// order they are first encountered during the scan.
pub(crate) fn fold_per_feed<Tz: TimeZone>(
    outcomes: &[RunOutcome],
    dimension: Dimension,
    tz: &Tz,
) -> FeedSeriesSet {
    let mut set = FeedSeriesSet {
        dimension,
        legend: Vec::new(),
        series: Vec::new(),
    };

    for outcome in outcomes {
        let idx = match set.legend.iter().position(|f| f == &outcome.feed) {
            Some(idx) => idx,
            None => {
                set.legend.push(outcome.feed.clone());
                set.series.push(BucketSeries::zeroed(dimension));
                set.legend.len() - 1
            }
        };
        let bucket = bucket_of(outcome.timestamp, dimension, tz);
        set.series[idx].values[bucket] += outcome.success;
    }

    set
}

fn aggregate(pool: &Pool, dimension: Dimension, scope: Scope) -> Result<Aggregation, StatsError> {
    let outcomes = storage::fetch_outcomes(pool)?;
    tracing::debug!(rows = outcomes.len(), ?dimension, ?scope, "aggregating outcomes");

    Ok(match scope {
        Scope::All => Aggregation::Global(fold_global(&outcomes, dimension, &Local)),
        Scope::PerFeed => Aggregation::PerFeed(fold_per_feed(&outcomes, dimension, &Local)),
    })
}

/// Group recorded success counts by local-time hour of day (0-23).
pub fn aggregate_by_hour(pool: &Pool, scope: Scope) -> Result<Aggregation, StatsError> {
    aggregate(pool, Dimension::HourOfDay, scope)
}

/// Group recorded success counts by local-time day of week, Monday-first.
pub fn aggregate_by_weekday(pool: &Pool, scope: Scope) -> Result<Aggregation, StatsError> {
    aggregate(pool, Dimension::Weekday, scope)
}
