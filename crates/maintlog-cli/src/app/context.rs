//! Application context for the Maintlog CLI.
//!
//! Combines CLI arguments with the lazily-loaded configuration and is the
//! composition root for the record store.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::unsync::OnceCell;
use tracing::debug;

use maintlog_core::remote::{self, NullRemote};
use maintlog_core::storage::open_local;
use maintlog_core::{RecordStore, RemoteAdapter};

use crate::cli::Cli;
use crate::config::MaintlogConfig;
use crate::constants::API_KEY_ENV;
use crate::helpers::OutputFormat;
use crate::ui::UiContext;

use super::resolver::{load_config, resolve_config_path, resolve_data_dir};

/// Application context that bundles CLI args with configuration.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<MaintlogConfig>,
}

impl<'a> AppContext<'a> {
    /// Create a new application context from CLI arguments.
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
        }
    }

    /// Get the CLI arguments.
    pub fn cli(&self) -> &Cli {
        self.cli
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// Get the configuration, loading it lazily if needed.
    pub fn config(&self) -> anyhow::Result<&MaintlogConfig> {
        self.config.get_or_try_init(|| load_config(self.cli))
    }

    pub fn config_path(&self) -> anyhow::Result<PathBuf> {
        resolve_config_path(self.cli)
    }

    pub fn data_dir(&self) -> anyhow::Result<PathBuf> {
        resolve_data_dir(self.cli, self.config()?)
    }

    /// Create a UI context using the global `--no-color` and `--ascii` flags.
    pub fn ui_context(&self, json: bool, format: Option<OutputFormat>) -> UiContext {
        let plain = format == Some(OutputFormat::Plain);
        UiContext::from_env(json, plain, self.cli.no_color, self.cli.ascii)
    }

    /// Build the remote adapter. `--offline` always yields the null backend.
    pub fn remote(&self) -> anyhow::Result<Arc<dyn RemoteAdapter>> {
        if self.cli.offline {
            debug!("offline mode; remote disabled");
            return Ok(Arc::new(NullRemote));
        }
        let config = self.config()?;
        let remote_config = config
            .remote
            .clone()
            .with_api_key_fallback(std::env::var(API_KEY_ENV).ok());
        Ok(remote::build(&remote_config, &config.sync.remote_options())?)
    }

    /// Open the record store over the configured local slot and remote.
    pub fn open_store(&self) -> anyhow::Result<RecordStore> {
        let config = self.config()?;
        let dir = self.data_dir()?;
        let local = open_local(config.storage.backend, &dir, &config.storage.slot)?;
        let remote = self.remote()?;
        debug!(
            backend = config.storage.backend.as_str(),
            remote = remote.name(),
            "opening record store"
        );
        Ok(RecordStore::new(local, remote)
            .with_policy(config.sync.load_policy)
            .with_user(config.user.name.clone()))
    }
}
