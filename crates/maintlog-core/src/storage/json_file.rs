//! JSON file slot backend.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{encode_deleted, encode_slot, parse_deleted, parse_slot, LocalStore};
use crate::error::{MaintlogError, Result};
use crate::fs::write_atomic;
use crate::record::MaintenanceRecord;

/// Slot stored as `<dir>/<slot>.json`; deleted ids in `<dir>/<slot>.deleted.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    deleted_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: &Path, slot: &str) -> Self {
        Self {
            path: dir.join(format!("{}.json", slot)),
            deleted_path: dir.join(format!("{}.deleted.json", slot)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LocalStore for JsonFileStore {
    fn read_all(&self) -> Vec<MaintenanceRecord> {
        match fs::read_to_string(&self.path) {
            Ok(text) => parse_slot(&text),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "local slot does not exist yet");
                Vec::new()
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "cannot read local slot; treating as empty");
                Vec::new()
            }
        }
    }

    fn write_all(&mut self, records: &[MaintenanceRecord]) -> Result<()> {
        let text = encode_slot(records)?;
        write_atomic(&self.path, text.as_bytes()).map_err(|err| {
            MaintlogError::Storage(format!("Cannot write {}: {}", self.path.display(), err))
        })?;
        debug!(path = %self.path.display(), count = records.len(), "local slot written");
        Ok(())
    }

    fn read_deleted(&self) -> Vec<String> {
        match fs::read_to_string(&self.deleted_path) {
            Ok(text) => parse_deleted(&text),
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(err) => {
                warn!(path = %self.deleted_path.display(), error = %err, "cannot read deleted-id list");
                Vec::new()
            }
        }
    }

    fn write_deleted(&mut self, ids: &[String]) -> Result<()> {
        let text = encode_deleted(ids)?;
        write_atomic(&self.deleted_path, text.as_bytes()).map_err(|err| {
            MaintlogError::Storage(format!("Cannot write {}: {}", self.deleted_path.display(), err))
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordInput;
    use chrono::Utc;
    use tempfile::tempdir;

    fn record(id: &str) -> MaintenanceRecord {
        RecordInput::new("Press-1", "Line A", "Motor").into_record(
            id.to_string(),
            Utc::now(),
            "User".to_string(),
        )
    }

    #[test]
    fn test_missing_file_reads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path(), "maintenanceLogs");
        assert!(store.read_all().is_empty());
        assert!(store.describe().ends_with("maintenanceLogs.json"));
    }

    #[test]
    fn test_write_then_read_preserves_order() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(&dir.path().join("data"), "maintenanceLogs");
        let records = vec![record("b"), record("a")];

        store.write_all(&records).unwrap();

        assert_eq!(store.read_all(), records);
    }

    #[test]
    fn test_deleted_ids_persist_beside_slot() {
        let dir = tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path(), "maintenanceLogs");
        assert!(store.read_deleted().is_empty());

        store.write_deleted(&["a".to_string()]).unwrap();

        let reopened = JsonFileStore::new(dir.path(), "maintenanceLogs");
        assert_eq!(reopened.read_deleted(), vec!["a".to_string()]);
        assert!(dir.path().join("maintenanceLogs.deleted.json").exists());
        assert!(reopened.read_all().is_empty());
    }

    #[test]
    fn test_corrupt_file_reads_empty() {
        let dir = tempdir().unwrap();
        let store = JsonFileStore::new(dir.path(), "maintenanceLogs");
        fs::write(store.path(), "[{oops").unwrap();
        assert!(store.read_all().is_empty());
    }

    #[test]
    fn test_write_into_file_parent_fails() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let mut store = JsonFileStore::new(&blocker, "maintenanceLogs");

        let err = store.write_all(&[record("a")]).unwrap_err();
        assert!(matches!(err, MaintlogError::Storage(_)));
    }
}
