//! Fetchstat -- run-outcome statistics for scheduled feed-fetch tasks.
//!
//! This crate records one row per completed fetch run (how many entries
//! survived, how many were dropped) into SQLite, and at shutdown renders
//! hour-of-day and day-of-week charts into a single static HTML report.
//!
//! The host task runner drives everything through three entrypoints on
//! [`lifecycle::StatisticsHook`]: task start, task end, process shutdown.
//! Nothing here schedules itself or holds state across invocations.

pub mod chart;
pub mod config;
pub mod lifecycle;
pub mod report;
pub mod stats;
pub mod storage;

pub use config::{Capabilities, Config};
pub use lifecycle::StatisticsHook;
pub use stats::StatsError;
