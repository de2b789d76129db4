//! Host-facing lifecycle entrypoints.
//!
//! The external task runner drives this subsystem at exactly three
//! points: task start (total entries observed), task end (surviving
//! entries, which triggers a record), and process shutdown (report
//! generation). Each call opens and drops its own store handle; nothing
//! is held across invocations and nothing is retried.

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use crate::config::{Capabilities, Config};
use crate::report;
use crate::stats::StatsError;
use crate::storage;

pub struct StatisticsHook {
    config: Config,
    capabilities: Capabilities,
    /// Total entries observed at task start, keyed by feed, awaiting
    /// the matching task end.
    pending: HashMap<String, u64>,
}

impl StatisticsHook {
    /// Probe collaborator capabilities once and construct the hook.
    pub fn new(config: Config) -> Self {
        let capabilities = Capabilities::probe(&config);
        Self {
            config,
            capabilities,
            pending: HashMap::new(),
        }
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Task start: capture the total number of entries the fetch saw.
    pub fn on_task_start(&mut self, feed: &str, total_entries: u64) {
        tracing::debug!(feed, total_entries, "task start observed");
        self.pending.insert(feed.to_string(), total_entries);
    }

    /// Task end: derive failures as (total at start - surviving) and
    /// append one outcome row. A run with no observed start writes
    /// nothing; that sample is dropped.
    pub fn on_task_end(&mut self, feed: &str, surviving_entries: u64) -> Result<(), StatsError> {
        if !self.capabilities.storage {
            return Err(StatsError::StorageUnavailable(
                "statistics store capability absent".to_string(),
            ));
        }

        let Some(total) = self.pending.remove(feed) else {
            tracing::warn!(feed, "task end without matching start; dropping sample");
            return Ok(());
        };
        let failure = total.saturating_sub(surviving_entries);

        let pool = storage::open_pool(&self.config.db_path())?;
        storage::record_outcome(&pool, feed, surviving_entries, failure, Utc::now())?;
        tracing::info!(feed, success = surviving_entries, failure, "run outcome recorded");
        Ok(())
    }

    /// Process shutdown: render and write the statistics report. A
    /// failure here never affects recorded rows or the next run.
    pub fn on_shutdown(&self) -> Result<PathBuf> {
        report::generate_statistics(&self.config, &self.capabilities)
    }
}
