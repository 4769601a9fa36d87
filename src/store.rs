use std::path::Path;

use rusqlite::Connection;
use tracing::debug;

/// One recorded usage row. Rows are immutable once written; the id and
/// timestamp are assigned by SQLite at insert time.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub id: i64,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub recorded_at: String,
}

/// Errors from [`SampleStore`] operations.
#[derive(Debug)]
pub enum StoreError {
    /// SQLite error.
    Sqlite(rusqlite::Error),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(e) => write!(f, "SQLite error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        Self::Sqlite(e)
    }
}

const USAGE_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS usage (
    id           INTEGER PRIMARY KEY,
    cpu_usage    REAL,
    memory_usage REAL,
    disk_usage   REAL,
    timestamp    DATETIME DEFAULT CURRENT_TIMESTAMP
);
";

/// SQLite-backed append-only store of usage samples.
///
/// The connection is owned exclusively by the application and only touched
/// from the event loop, so no locking is involved.
pub struct SampleStore {
    conn: Connection,
}

impl SampleStore {
    /// Open or create a store at the given path. Idempotent: reopening an
    /// existing database leaves its table and rows untouched.
    pub fn open(db_path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch(USAGE_SCHEMA)?;
        debug!(path = %db_path.display(), "sample store opened");
        Ok(Self { conn })
    }

    /// Open an in-memory store (for tests and benches).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(USAGE_SCHEMA)?;
        Ok(Self { conn })
    }

    /// Append one sample. The timestamp is defaulted server-side. Returns
    /// the id SQLite assigned to the row.
    pub fn append(&self, cpu: f64, memory: f64, disk: f64) -> Result<i64, StoreError> {
        self.conn.execute(
            "INSERT INTO usage (cpu_usage, memory_usage, disk_usage) VALUES (?1, ?2, ?3)",
            rusqlite::params![cpu, memory, disk],
        )?;
        let id = self.conn.last_insert_rowid();
        debug!(id, "sample appended");
        Ok(id)
    }

    /// All rows in primary-key order. No pagination, no filtering.
    pub fn list_all(&self) -> Result<Vec<Sample>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, cpu_usage, memory_usage, disk_usage, timestamp \
             FROM usage ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(Sample {
                id: row.get(0)?,
                cpu_percent: row.get(1)?,
                memory_percent: row.get(2)?,
                disk_percent: row.get(3)?,
                recorded_at: row.get(4)?,
            })
        })?;

        let samples = rows.collect::<Result<Vec<_>, _>>()?;
        debug!(count = samples.len(), "sample store scanned");
        Ok(samples)
    }

    /// Release the connection. Called exactly once on the orderly-exit path.
    pub fn close(self) -> Result<(), StoreError> {
        self.conn.close().map_err(|(_conn, e)| StoreError::from(e))
    }
}
