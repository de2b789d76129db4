//! Database schema and migrations.

use anyhow::Result;
use rusqlite::Connection;

/// Create the statistics table if it does not exist. Idempotent; the
/// recorder runs this on every pool open.
///
/// No primary key on purpose: rows are append-only observations and the
/// schema must stay additive-compatible with databases written by earlier
/// versions of the recorder.
pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS statistics (
            timestamp TEXT NOT NULL,
            feed TEXT NOT NULL,
            success INTEGER NOT NULL,
            failure INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_statistics_timestamp ON statistics(timestamp);",
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_creates_table() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM statistics", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap(); // Should not error

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='statistics'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }
}
