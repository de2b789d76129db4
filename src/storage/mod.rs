//! SQLite statistics store -- schema, pool, outcome rows.
//!
//! The store is append-only: one row per completed fetch run, committed
//! individually. Nothing in this crate updates or deletes rows.

pub mod schema;

use std::path::Path;

use chrono::{DateTime, Utc};
use r2d2::Pool as R2D2Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::stats::StatsError;

/// Connection pool type.
pub type Pool = R2D2Pool<SqliteConnectionManager>;

/// One recorded run outcome. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RunOutcome {
    pub timestamp: DateTime<Utc>,
    pub feed: String,
    pub success: u64,
    pub failure: u64,
}

/// Open (or create) the statistics database and return a connection pool.
/// Runs migrations, so the schema exists after the first successful call.
pub fn open_pool(path: &Path) -> Result<Pool, StatsError> {
    let manager = SqliteConnectionManager::file(path).with_init(|c| {
        c.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;",
        )
    });

    let pool = R2D2Pool::new(manager)
        .map_err(|e| StatsError::StorageUnavailable(format!("{}: {e}", path.display())))?;

    let conn = pool
        .get()
        .map_err(|e| StatsError::StorageUnavailable(format!("{}: {e}", path.display())))?;
    schema::migrate(&conn)
        .map_err(|e| StatsError::StorageUnavailable(format!("{}: {e}", path.display())))?;

    Ok(pool)
}

/// Append one outcome row. Exactly one parameterized single-row commit;
/// a failure here leaves previously committed rows untouched.
pub fn record_outcome(
    pool: &Pool,
    feed: &str,
    success: u64,
    failure: u64,
    timestamp: DateTime<Utc>,
) -> Result<(), StatsError> {
    let conn = pool
        .get()
        .map_err(|e| StatsError::StorageUnavailable(e.to_string()))?;

    conn.execute(
        "INSERT INTO statistics (timestamp, feed, success, failure)
         VALUES (?1, ?2, ?3, ?4)",
        rusqlite::params![timestamp.to_rfc3339(), feed, success, failure],
    )
    .map_err(|e| StatsError::StorageUnavailable(e.to_string()))?;

    Ok(())
}

/// Full scan of recorded outcomes in insertion order. The aggregation
/// engine recomputes from this on every report call; legend ordering
/// depends on the scan order being stable.
pub fn fetch_outcomes(pool: &Pool) -> Result<Vec<RunOutcome>, StatsError> {
    let conn = pool
        .get()
        .map_err(|e| StatsError::StorageUnavailable(e.to_string()))?;

    let mut stmt = conn
        .prepare("SELECT timestamp, feed, success, failure FROM statistics ORDER BY rowid")
        .map_err(|e| StatsError::StorageUnavailable(e.to_string()))?;

    let rows = stmt
        .query_map([], |row| {
            let ts: String = row.get(0)?;
            let feed: String = row.get(1)?;
            let success: i64 = row.get(2)?;
            let failure: i64 = row.get(3)?;
            Ok((ts, feed, success, failure))
        })
        .map_err(|e| StatsError::StorageUnavailable(e.to_string()))?;

    let mut outcomes = Vec::new();
    for row in rows {
        let (ts, feed, success, failure) =
            row.map_err(|e| StatsError::StorageUnavailable(e.to_string()))?;
        let timestamp = DateTime::parse_from_rfc3339(&ts)
            .map_err(|e| StatsError::StorageUnavailable(format!("bad timestamp {ts:?}: {e}")))?
            .with_timezone(&Utc);
        outcomes.push(RunOutcome {
            timestamp,
            feed,
            success: success.max(0) as u64,
            failure: failure.max(0) as u64,
        });
    }

    Ok(outcomes)
}
