//! In-process slot backend.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{encode_deleted, encode_slot, parse_deleted, parse_slot, LocalStore};
use crate::error::{MaintlogError, Result};
use crate::record::MaintenanceRecord;

/// Slot held in memory.
///
/// Clones share the same slot, so a test can hand one clone to a record
/// store and inspect or reopen through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
    deleted: Arc<Mutex<Option<String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store whose writes always fail.
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    /// Store seeded with raw slot text (which may be corrupt).
    pub fn with_raw(text: impl Into<String>) -> Self {
        let store = Self::default();
        if let Ok(mut slot) = store.slot.lock() {
            *slot = Some(text.into());
        }
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    fn store_text(&self, cell: &Mutex<Option<String>>, text: String) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(MaintlogError::Storage(
                "memory slot rejected the write".to_string(),
            ));
        }
        let mut guard = cell
            .lock()
            .map_err(|_| MaintlogError::Storage("memory slot poisoned".to_string()))?;
        *guard = Some(text);
        Ok(())
    }

    /// Current slot text, if anything was written.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl LocalStore for MemoryStore {
    fn read_all(&self) -> Vec<MaintenanceRecord> {
        self.raw().map(|text| parse_slot(&text)).unwrap_or_default()
    }

    fn write_all(&mut self, records: &[MaintenanceRecord]) -> Result<()> {
        let text = encode_slot(records)?;
        self.store_text(&self.slot, text)
    }

    fn read_deleted(&self) -> Vec<String> {
        self.deleted
            .lock()
            .ok()
            .and_then(|deleted| deleted.clone())
            .map(|text| parse_deleted(&text))
            .unwrap_or_default()
    }

    fn write_deleted(&mut self, ids: &[String]) -> Result<()> {
        let text = encode_deleted(ids)?;
        self.store_text(&self.deleted, text)
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
