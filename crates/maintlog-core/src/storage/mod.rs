//! Local slot persistence.
//!
//! The whole record collection lives in one named slot as a JSON array.
//! Backends differ only in where the slot text is kept.

mod json_file;
mod memory;
mod sqlite;
mod traits;

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{MaintlogError, Result};
use crate::record::MaintenanceRecord;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteSlotStore;
pub use traits::LocalStore;

/// Slot name used when none is configured.
pub const DEFAULT_SLOT: &str = "maintenanceLogs";

/// File name of the SQLite database inside the data directory.
pub const SQLITE_FILE_NAME: &str = "maintlog.db";

/// Local backend selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    File,
    Sqlite,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::File => "file",
            StorageBackend::Sqlite => "sqlite",
        }
    }
}

impl FromStr for StorageBackend {
    type Err = MaintlogError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" | "json" => Ok(StorageBackend::File),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => Err(MaintlogError::InvalidInput(format!(
                "Unknown storage backend \"{}\" (expected file or sqlite)",
                other
            ))),
        }
    }
}

/// Open the configured local store rooted at the data directory `dir`.
///
/// # Errors
///
/// Returns `MaintlogError::Storage` if the SQLite database cannot be opened
/// or the slot name is empty.
pub fn open_local(backend: StorageBackend, dir: &Path, slot: &str) -> Result<Box<dyn LocalStore>> {
    if slot.trim().is_empty() {
        return Err(MaintlogError::Storage("Slot name is empty".to_string()));
    }
    match backend {
        StorageBackend::File => Ok(Box::new(JsonFileStore::new(dir, slot))),
        StorageBackend::Sqlite => Ok(Box::new(SqliteSlotStore::open(
            &dir.join(SQLITE_FILE_NAME),
            slot,
        )?)),
    }
}

/// Decode slot text into records.
///
/// Corrupt text or a non-array value reads as an empty collection. Elements
/// that fail to decode are skipped; the rest are kept in order.
pub fn parse_slot(text: &str) -> Vec<MaintenanceRecord> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let value: serde_json::Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "local slot is not valid JSON; treating as empty");
            return Vec::new();
        }
    };

    let serde_json::Value::Array(items) = value else {
        warn!("local slot is not a JSON array; treating as empty");
        return Vec::new();
    };

    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(index, error = %err, "skipping undecodable record in local slot");
                None
            }
        })
        .collect()
}

/// Decode the deleted-id list. Anything unreadable is an empty list.
pub fn parse_deleted(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(text).unwrap_or_else(|err| {
        warn!(error = %err, "deleted-id list is corrupt; treating as empty");
        Vec::new()
    })
}

pub(crate) fn encode_deleted(ids: &[String]) -> Result<String> {
    Ok(serde_json::to_string(ids)?)
}

/// Encode records as slot text.
pub(crate) fn encode_slot(records: &[MaintenanceRecord]) -> Result<String> {
    Ok(serde_json::to_string(records)?)
}
