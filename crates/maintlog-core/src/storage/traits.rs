//! Local store trait definition.

use crate::error::Result;
use crate::record::MaintenanceRecord;

/// Durable home of the record collection.
///
/// Implementations must ensure:
/// - `read_all` never fails; a missing or corrupt slot reads as empty
/// - `write_all` replaces the whole slot, and a failed write leaves the
///   previous contents readable
/// - the deleted-id list lives next to the slot and follows the same rules
pub trait LocalStore: Send {
    /// Read the full collection in stored order.
    fn read_all(&self) -> Vec<MaintenanceRecord>;

    /// Replace the stored collection.
    ///
    /// # Errors
    ///
    /// Returns `MaintlogError::Storage` if the slot cannot be written.
    fn write_all(&mut self, records: &[MaintenanceRecord]) -> Result<()>;

    /// Ids deleted locally, so a remote listing cannot bring them back.
    fn read_deleted(&self) -> Vec<String>;

    /// Replace the deleted-id list.
    ///
    /// # Errors
    ///
    /// Returns `MaintlogError::Storage` if the list cannot be written.
    fn write_deleted(&mut self, ids: &[String]) -> Result<()>;

    /// Human-readable location, for diagnostics.
    fn describe(&self) -> String;
}
