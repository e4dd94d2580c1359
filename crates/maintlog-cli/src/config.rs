use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use maintlog_core::record::DEFAULT_CREATED_BY;
use maintlog_core::remote::{RemoteOptions, DEFAULT_TIMEOUT};
use maintlog_core::storage::{StorageBackend, DEFAULT_SLOT};
use maintlog_core::{LoadPolicy, RemoteConfig};

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct MaintlogConfig {
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub sync: SyncSection,
    #[serde(default)]
    pub user: UserSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StorageSection {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Data directory; the XDG data dir when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default = "default_slot")]
    pub slot: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SyncSection {
    #[serde(default)]
    pub load_policy: LoadPolicy,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserSection {
    #[serde(default = "default_user_name")]
    pub name: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            slot: default_slot(),
        }
    }
}

impl Default for SyncSection {
    fn default() -> Self {
        Self {
            load_policy: LoadPolicy::default(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for UserSection {
    fn default() -> Self {
        Self {
            name: default_user_name(),
        }
    }
}

impl SyncSection {
    /// HTTP options for the remote adapters. A zero timeout falls back to the default.
    pub fn remote_options(&self) -> RemoteOptions {
        let timeout = if self.timeout_seconds == 0 {
            DEFAULT_TIMEOUT
        } else {
            Duration::from_secs(self.timeout_seconds)
        };
        RemoteOptions { timeout }
    }
}

fn default_slot() -> String {
    DEFAULT_SLOT.to_string()
}

fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT.as_secs()
}

fn default_user_name() -> String {
    DEFAULT_CREATED_BY.to_string()
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    xdg_data_dir()
}

pub fn read_config(path: &Path) -> anyhow::Result<MaintlogConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &MaintlogConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("maintlog"));
        }
    }
    Ok(home_dir()?.join(".config").join("maintlog"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("maintlog"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("maintlog"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: MaintlogConfig = toml::from_str("").unwrap();
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.slot, DEFAULT_SLOT);
        assert!(config.remote.is_none());
        assert_eq!(config.sync.load_policy, LoadPolicy::MirrorOnly);
        assert_eq!(config.sync.timeout_seconds, 30);
        assert_eq!(config.user.name, "User");
    }

    #[test]
    fn test_parses_rest_remote() {
        let text = r#"
[storage]
backend = "sqlite"
path = "/srv/maintlog"

[remote]
kind = "rest"
url = "https://db.example.com"
api_key = "anon"

[sync]
load_policy = "remote_authoritative"
timeout_seconds = 5

[user]
name = "Dana"
"#;
        let config: MaintlogConfig = toml::from_str(text).unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.path.as_deref(), Some("/srv/maintlog"));
        assert_eq!(config.remote.kind(), "rest");
        match &config.remote {
            RemoteConfig::Rest { table, bucket, .. } => {
                assert_eq!(table, "maintenance_logs");
                assert_eq!(bucket, "maintenance-files");
            }
            other => panic!("unexpected remote {:?}", other),
        }
        assert_eq!(config.sync.load_policy, LoadPolicy::RemoteAuthoritative);
        assert_eq!(config.sync.remote_options().timeout, Duration::from_secs(5));
        assert_eq!(config.user.name, "Dana");
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let sync = SyncSection {
            load_policy: LoadPolicy::Merge,
            timeout_seconds: 0,
        };
        assert_eq!(sync.remote_options().timeout, DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = MaintlogConfig {
            remote: RemoteConfig::Script {
                url: "https://script.example.com/exec".to_string(),
            },
            ..MaintlogConfig::default()
        };
        write_config(&path, &config).unwrap();

        let loaded = read_config(&path).unwrap();
        assert_eq!(loaded.remote, config.remote);
        assert_eq!(loaded.storage.slot, DEFAULT_SLOT);
    }

    #[test]
    fn test_read_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[remote]\nkind = \"ftp\"\n").unwrap();
        let err = read_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }
}
