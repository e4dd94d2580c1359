//! Best-effort remote mirrors.
//!
//! A remote backend is one of a fixed set of variants selected by
//! configuration. Each variant implements [`RemoteAdapter`]; "no remote" is
//! the [`NullRemote`] null object, so callers never branch on presence.

mod document;
mod error;
mod http;
mod null;
mod rest;
mod script;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{MaintlogError, Result};
use crate::record::MaintenanceRecord;

pub use document::DocumentAdapter;
pub use error::RemoteError;
pub use null::NullRemote;
pub use rest::RestAdapter;
pub use script::ScriptAdapter;

/// Default relational table.
pub const DEFAULT_TABLE: &str = "maintenance_logs";
/// Default object storage bucket for attachments.
pub const DEFAULT_BUCKET: &str = "maintenance-files";
/// Default document collection.
pub const DEFAULT_COLLECTION: &str = "maintenance_logs";
/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Acknowledgement of a completed remote write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack;

/// Uniform contract over every remote backend.
#[async_trait]
pub trait RemoteAdapter: Send + Sync {
    /// Short backend name for logs and diagnostics.
    fn name(&self) -> &'static str;

    /// False only for the null backend.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Insert or replace one record.
    async fn put(&self, record: &MaintenanceRecord) -> std::result::Result<Ack, RemoteError>;

    /// Fetch every record the backend holds.
    async fn get_all(&self) -> std::result::Result<Vec<MaintenanceRecord>, RemoteError>;

    /// Delete one record by id.
    async fn remove(&self, id: &str) -> std::result::Result<Ack, RemoteError>;

    /// Store a binary attachment and return a reference to it (URL or data URI).
    async fn upload_blob(
        &self,
        bytes: &[u8],
        name: &str,
        mime_type: &str,
    ) -> std::result::Result<String, RemoteError>;
}

/// Remote backend selection, tagged by `kind`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RemoteConfig {
    /// Local-only operation
    #[default]
    None,

    /// Hosted relational API (PostgREST style) with object storage
    Rest {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
        #[serde(default = "default_table")]
        table: String,
        #[serde(default = "default_bucket")]
        bucket: String,
    },

    /// Document database over HTTP
    Document {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        api_key: Option<String>,
        #[serde(default = "default_collection")]
        collection: String,
    },

    /// Spreadsheet-script endpoint taking `{ action, ... }` envelopes
    Script { url: String },
}

impl RemoteConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            RemoteConfig::None => "none",
            RemoteConfig::Rest { .. } => "rest",
            RemoteConfig::Document { .. } => "document",
            RemoteConfig::Script { .. } => "script",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, RemoteConfig::None)
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            RemoteConfig::None => None,
            RemoteConfig::Rest { url, .. }
            | RemoteConfig::Document { url, .. }
            | RemoteConfig::Script { url } => Some(url),
        }
    }

    /// Fill in an API key from outside the config file when none is set.
    pub fn with_api_key_fallback(mut self, key: Option<String>) -> Self {
        if let RemoteConfig::Rest { api_key, .. } | RemoteConfig::Document { api_key, .. } =
            &mut self
        {
            if api_key.as_deref().map_or(true, |k| k.trim().is_empty()) {
                *api_key = key.filter(|k| !k.trim().is_empty());
            }
        }
        self
    }
}

/// Transport settings shared by all HTTP adapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoteOptions {
    pub timeout: Duration,
}

impl Default for RemoteOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Build the adapter selected by `config`.
///
/// # Errors
///
/// Returns `MaintlogError::InvalidInput` if the URL is not an http(s)
/// address, a REST backend has no API key, or the HTTP client cannot be
/// built.
pub fn build(config: &RemoteConfig, options: &RemoteOptions) -> Result<Arc<dyn RemoteAdapter>> {
    let invalid = |message: String| MaintlogError::InvalidInput(format!("remote: {}", message));

    match config {
        RemoteConfig::None => Ok(Arc::new(NullRemote)),
        RemoteConfig::Rest {
            url,
            api_key,
            table,
            bucket,
        } => {
            let base = http::base_url(url).map_err(invalid)?;
            let key = api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| invalid("rest backend requires an api_key".to_string()))?;
            let client = http::client(options).map_err(|e| invalid(e.to_string()))?;
            Ok(Arc::new(RestAdapter::new(client, base, key, table, bucket)))
        }
        RemoteConfig::Document {
            url,
            api_key,
            collection,
        } => {
            let base = http::base_url(url).map_err(invalid)?;
            let client = http::client(options).map_err(|e| invalid(e.to_string()))?;
            Ok(Arc::new(DocumentAdapter::new(
                client,
                base,
                api_key.clone(),
                collection,
            )))
        }
        RemoteConfig::Script { url } => {
            let base = http::base_url(url).map_err(invalid)?;
            let client = http::client(options).map_err(|e| invalid(e.to_string()))?;
            Ok(Arc::new(ScriptAdapter::new(client, base)))
        }
    }
}

fn default_table() -> String {
    DEFAULT_TABLE.to_string()
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults_from_toml_like_json() {
        let config: RemoteConfig = serde_json::from_value(serde_json::json!({
            "kind": "rest",
            "url": "https://abc.example.co",
            "api_key": "anon"
        }))
        .unwrap();
        match config {
            RemoteConfig::Rest { table, bucket, .. } => {
                assert_eq!(table, DEFAULT_TABLE);
                assert_eq!(bucket, DEFAULT_BUCKET);
            }
            other => panic!("unexpected config: {:?}", other),
        }
    }

    #[test]
    fn test_build_none_is_disabled() {
        let adapter = build(&RemoteConfig::None, &RemoteOptions::default()).unwrap();
        assert!(!adapter.is_enabled());
        assert_eq!(adapter.name(), "none");
    }

    #[test]
    fn test_build_selects_variant() {
        let options = RemoteOptions::default();
        let script = build(
            &RemoteConfig::Script {
                url: "https://script.example.com/macros/s/abc/exec".to_string(),
            },
            &options,
        )
        .unwrap();
        assert_eq!(script.name(), "script");
        assert!(script.is_enabled());

        let document = build(
            &RemoteConfig::Document {
                url: "https://docs.example.com/v1".to_string(),
                api_key: None,
                collection: DEFAULT_COLLECTION.to_string(),
            },
            &options,
        )
        .unwrap();
        assert_eq!(document.name(), "document");
    }

    #[test]
    fn test_build_rest_requires_key() {
        let config = RemoteConfig::Rest {
            url: "https://abc.example.co".to_string(),
            api_key: None,
            table: DEFAULT_TABLE.to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
        };
        let err = build(&config, &RemoteOptions::default()).err().unwrap();
        assert!(matches!(err, MaintlogError::InvalidInput(_)));

        let config = config.with_api_key_fallback(Some("anon".to_string()));
        assert!(build(&config, &RemoteOptions::default()).is_ok());
    }

    #[test]
    fn test_build_rejects_bad_url() {
        let config = RemoteConfig::Script {
            url: "hhttps//broken".to_string(),
        };
        assert!(build(&config, &RemoteOptions::default()).is_err());
    }

    #[test]
    fn test_api_key_fallback_keeps_configured_key() {
        let config = RemoteConfig::Document {
            url: "https://docs.example.com".to_string(),
            api_key: Some("from-file".to_string()),
            collection: DEFAULT_COLLECTION.to_string(),
        }
        .with_api_key_fallback(Some("from-env".to_string()));
        match config {
            RemoteConfig::Document { api_key, .. } => {
                assert_eq!(api_key.as_deref(), Some("from-file"))
            }
            other => panic!("unexpected config: {:?}", other),
        }
    }
}
