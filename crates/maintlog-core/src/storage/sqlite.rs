//! SQLite slot backend.
//!
//! Mirrors the key-value shape of browser storage: one row per named slot,
//! the value being the JSON array text.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, warn};

use super::{encode_deleted, encode_slot, parse_deleted, parse_slot, LocalStore};
use crate::error::Result;
use crate::record::MaintenanceRecord;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS slots (
    name TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)";

/// Slot stored as a row of the `slots` table. Deleted ids live in the row
/// named `<slot>.deleted`.
pub struct SqliteSlotStore {
    conn: Connection,
    path: Option<PathBuf>,
    slot: String,
}

impl SqliteSlotStore {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns `MaintlogError::Storage` if the parent directory cannot be
    /// created or the database cannot be opened.
    pub fn open(path: &Path, slot: &str) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init(conn, Some(path.to_path_buf()), slot)
    }

    /// Database that lives only as long as the store.
    pub fn open_in_memory(slot: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn, None, slot)
    }

    fn init(conn: Connection, path: Option<PathBuf>, slot: &str) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn,
            path,
            slot: slot.to_string(),
        })
    }

    fn deleted_slot(&self) -> String {
        format!("{}.deleted", self.slot)
    }

    fn read_value(&self, name: &str) -> rusqlite::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM slots WHERE name = ?1",
                params![name],
                |row| row.get(0),
            )
            .optional()
    }

    fn write_value(&self, name: &str, text: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO slots (name, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![name, text, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

impl LocalStore for SqliteSlotStore {
    fn read_all(&self) -> Vec<MaintenanceRecord> {
        match self.read_value(&self.slot) {
            Ok(Some(text)) => parse_slot(&text),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(slot = %self.slot, error = %err, "cannot read local slot; treating as empty");
                Vec::new()
            }
        }
    }

    fn write_all(&mut self, records: &[MaintenanceRecord]) -> Result<()> {
        let text = encode_slot(records)?;
        self.write_value(&self.slot, &text)?;
        debug!(slot = %self.slot, count = records.len(), "local slot written");
        Ok(())
    }

    fn read_deleted(&self) -> Vec<String> {
        match self.read_value(&self.deleted_slot()) {
            Ok(Some(text)) => parse_deleted(&text),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(slot = %self.slot, error = %err, "cannot read deleted-id list");
                Vec::new()
            }
        }
    }

    fn write_deleted(&mut self, ids: &[String]) -> Result<()> {
        let text = encode_deleted(ids)?;
        self.write_value(&self.deleted_slot(), &text)
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => format!("{} (slot {})", path.display(), self.slot),
            None => format!(":memory: (slot {})", self.slot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordInput;
    use tempfile::tempdir;

    fn record(id: &str) -> MaintenanceRecord {
        RecordInput::new("Lathe-2", "Line B", "Chuck").into_record(
            id.to_string(),
            Utc::now(),
            "User".to_string(),
        )
    }

    #[test]
    fn test_empty_database_reads_empty() {
        let store = SqliteSlotStore::open_in_memory("maintenanceLogs").unwrap();
        assert!(store.read_all().is_empty());
    }

    #[test]
    fn test_write_overwrites_slot() {
        let mut store = SqliteSlotStore::open_in_memory("maintenanceLogs").unwrap();
        store.write_all(&[record("a"), record("b")]).unwrap();
        store.write_all(&[record("c")]).unwrap();

        let ids: Vec<String> = store.read_all().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["c".to_string()]);
    }

    #[test]
    fn test_deleted_ids_do_not_touch_slot() {
        let mut store = SqliteSlotStore::open_in_memory("maintenanceLogs").unwrap();
        store.write_all(&[record("a")]).unwrap();
        store.write_deleted(&["b".to_string()]).unwrap();

        assert_eq!(store.read_all().len(), 1);
        assert_eq!(store.read_deleted(), vec!["b".to_string()]);
    }

    #[test]
    fn test_slots_are_independent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("maintlog.db");
        let mut first = SqliteSlotStore::open(&path, "maintenanceLogs").unwrap();
        first.write_all(&[record("a")]).unwrap();

        let other = SqliteSlotStore::open(&path, "archive").unwrap();
        assert!(other.read_all().is_empty());

        let reopened = SqliteSlotStore::open(&path, "maintenanceLogs").unwrap();
        assert_eq!(reopened.read_all().len(), 1);
        assert!(reopened.describe().contains("maintenanceLogs"));
    }
}
