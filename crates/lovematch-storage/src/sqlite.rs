use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{Connection, params};
use tracing::debug;

use crate::{CommitGate, CompatibilityRecord, RecordSink, StorageError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS compatibility_checks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name1 TEXT NOT NULL,
    name2 TEXT NOT NULL,
    compatibility INTEGER NOT NULL,
    created_at TEXT NOT NULL
);
";

pub struct SqliteStore {
    location: Option<PathBuf>,
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>, busy_timeout: Duration) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(&path)?;
        conn.busy_timeout(busy_timeout)?;
        Self::init(conn, Some(path))
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?, None)
    }

    fn init(conn: Connection, location: Option<PathBuf>) -> Result<Self, StorageError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            location,
            conn: Mutex::new(conn),
        })
    }
}

impl RecordSink for SqliteStore {
    fn append_gated(
        &self,
        record: &CompatibilityRecord,
        gate: &CommitGate,
    ) -> Result<(), StorageError> {
        let conn = self.conn.lock();
        if !gate.try_commit() {
            return Err(StorageError::Cancelled);
        }
        conn.execute(
            "INSERT INTO compatibility_checks (name1, name2, compatibility, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                record.name1,
                record.name2,
                record.compatibility,
                record.created_at.to_rfc3339()
            ],
        )?;
        debug!(rowid = conn.last_insert_rowid(), "inserted compatibility record");
        Ok(())
    }

    fn count(&self) -> Result<usize, StorageError> {
        let conn = self.conn.lock();
        let n: i64 =
            conn.query_row("SELECT COUNT(*) FROM compatibility_checks", [], |row| row.get(0))?;
        Ok(usize::try_from(n).unwrap_or(0))
    }

    fn recent(&self, limit: usize) -> Result<Vec<CompatibilityRecord>, StorageError> {
        let limit = i64::try_from(limit.max(1)).unwrap_or(i64::MAX);
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT name1, name2, compatibility, created_at
             FROM compatibility_checks ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit], |row| {
            let created_at: String = row.get(3)?;
            let created_at = DateTime::parse_from_rfc3339(&created_at)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?
                .with_timezone(&Utc);
            Ok(CompatibilityRecord {
                name1: row.get(0)?,
                name2: row.get(1)?,
                compatibility: row.get(2)?,
                created_at,
            })
        })?;
        let records = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn stats(&self) -> serde_json::Value {
        serde_json::json!({
            "backend": "sqlite",
            "path": self.location.as_ref().map_or_else(|| ":memory:".to_string(), |p| p.display().to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips_records() {
        let store = SqliteStore::open_in_memory().expect("open memory store");
        let record = CompatibilityRecord::new("Romeo", "Juliet", 45);
        store.append(&record).expect("append");
        store
            .append(&CompatibilityRecord::new("Suruchi", "Abhijeet", 1000))
            .expect("append soulmates");

        assert_eq!(store.count().expect("count"), 2);
        let recent = store.recent(5).expect("recent");
        assert_eq!(recent[0].compatibility, 1000);
        assert_eq!(recent[1], record);
    }

    #[test]
    fn file_store_persists_between_opens() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("db").join("lovematch.db");
        {
            let store = SqliteStore::open(&path, Duration::from_secs(1)).expect("open");
            store
                .append(&CompatibilityRecord::new("Batman", "Joker", 42))
                .expect("append");
        }
        let store = SqliteStore::open(&path, Duration::from_secs(1)).expect("reopen");
        assert_eq!(store.count().expect("count"), 1);
        assert_eq!(store.stats()["backend"], "sqlite");
    }

    #[test]
    fn cancelled_gate_blocks_insert() {
        let store = SqliteStore::open_in_memory().expect("open memory store");
        let gate = CommitGate::new();
        assert!(gate.try_cancel());
        assert!(matches!(
            store.append_gated(&CompatibilityRecord::new("Romeo", "Juliet", 45), &gate),
            Err(StorageError::Cancelled)
        ));
        assert_eq!(store.count().expect("count"), 0);
    }
}
