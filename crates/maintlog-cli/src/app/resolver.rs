use std::path::{Path, PathBuf};

use crate::cli::Cli;
use crate::config::{default_config_path, default_data_dir, read_config, MaintlogConfig};
use crate::errors::CliError;

pub fn resolve_config_path(cli: &Cli) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.config.as_ref() {
        if !path.as_os_str().is_empty() {
            return Ok(path.clone());
        }
    }
    default_config_path()
}

/// Load the config file.
///
/// A missing default config means local-only operation with defaults. A
/// config path given explicitly must exist.
pub fn load_config(cli: &Cli) -> anyhow::Result<MaintlogConfig> {
    let path = resolve_config_path(cli)?;
    if path.exists() {
        return read_config(&path);
    }
    if cli.config.is_some() {
        return Err(CliError::not_found(
            format!("Config file not found at {}", path.display()),
            missing_config_message(&path),
        )
        .into());
    }
    Ok(MaintlogConfig::default())
}

/// Data directory: `--store`, then `[storage] path`, then the XDG data dir.
pub fn resolve_data_dir(cli: &Cli, config: &MaintlogConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = cli.store.as_ref() {
        return Ok(path.clone());
    }
    if let Some(path) = config.storage.path.as_deref() {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    default_data_dir()
}

pub fn missing_config_message(config_path: &Path) -> String {
    format!(
        "Hint: Run `maintlog init` to create one, or point MAINTLOG_CONFIG at an existing file ({}).",
        config_path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_store_flag_wins_over_config() {
        let cli = Cli::parse_from(["maintlog", "--store", "/tmp/override", "list"]);
        let mut config = MaintlogConfig::default();
        config.storage.path = Some("/srv/maintlog".to_string());
        assert_eq!(
            resolve_data_dir(&cli, &config).unwrap(),
            PathBuf::from("/tmp/override")
        );
    }

    #[test]
    fn test_config_path_used_when_no_flag() {
        let cli = Cli::parse_from(["maintlog", "list"]);
        if cli.store.is_some() {
            // MAINTLOG_STORE is set in this environment
            return;
        }
        let mut config = MaintlogConfig::default();
        config.storage.path = Some("/srv/maintlog".to_string());
        assert_eq!(
            resolve_data_dir(&cli, &config).unwrap(),
            PathBuf::from("/srv/maintlog")
        );
    }

    #[test]
    fn test_explicit_missing_config_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let cli = Cli::parse_from([
            "maintlog",
            "--config",
            missing.to_str().unwrap(),
            "list",
        ]);
        let err = load_config(&cli).unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
        assert!(err.to_string().contains("maintlog init"));
    }
}
