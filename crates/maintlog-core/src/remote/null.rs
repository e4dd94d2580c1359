use async_trait::async_trait;

use super::{Ack, RemoteAdapter, RemoteError};
use crate::record::MaintenanceRecord;

/// Remote used when none is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRemote;

#[async_trait]
impl RemoteAdapter for NullRemote {
    fn name(&self) -> &'static str {
        "none"
    }

    fn is_enabled(&self) -> bool {
        false
    }

    async fn put(&self, _record: &MaintenanceRecord) -> Result<Ack, RemoteError> {
        Err(RemoteError::NotConfigured)
    }

    async fn get_all(&self) -> Result<Vec<MaintenanceRecord>, RemoteError> {
        Err(RemoteError::NotConfigured)
    }

    async fn remove(&self, _id: &str) -> Result<Ack, RemoteError> {
        Err(RemoteError::NotConfigured)
    }

    async fn upload_blob(
        &self,
        _bytes: &[u8],
        _name: &str,
        _mime_type: &str,
    ) -> Result<String, RemoteError> {
        Err(RemoteError::NotConfigured)
    }
}
