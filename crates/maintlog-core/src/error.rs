//! Error types for Maintlog core operations.
//!
//! Only local outcomes live here. Remote failures have their own type
//! (`remote::RemoteError`) and never cross the record store boundary.

use thiserror::Error;

/// Result type alias for Maintlog operations.
pub type Result<T> = std::result::Result<T, MaintlogError>;

/// Core error type for Maintlog operations.
#[derive(Debug, Error)]
pub enum MaintlogError {
    /// Form input is missing a required field or carries an invalid value
    #[error("Validation error: {0}")]
    Validation(String),

    /// No record with the requested id
    #[error("Not found: {0}")]
    NotFound(String),

    /// Local persistence failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid user input that is not a form field (ambiguous id prefix, bad config)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl MaintlogError {
    pub(crate) fn missing_record(id: &str) -> Self {
        MaintlogError::NotFound(format!("maintenance record {}", id))
    }
}

impl From<std::io::Error> for MaintlogError {
    fn from(err: std::io::Error) -> Self {
        MaintlogError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for MaintlogError {
    fn from(err: serde_json::Error) -> Self {
        MaintlogError::Storage(format!("Slot serialization failed: {}", err))
    }
}

impl From<rusqlite::Error> for MaintlogError {
    fn from(err: rusqlite::Error) -> Self {
        MaintlogError::Storage(format!("SQLite error: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_maps_to_storage() {
        let err: MaintlogError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into();
        assert!(matches!(err, MaintlogError::Storage(_)));
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn test_missing_record_message() {
        let err = MaintlogError::missing_record("abc");
        assert_eq!(err.to_string(), "Not found: maintenance record abc");
    }
}
