use std::path::PathBuf;

use dialoguer::{theme::ColorfulTheme, Input, Select};

use maintlog_core::remote::{
    self, RemoteOptions, DEFAULT_BUCKET, DEFAULT_COLLECTION, DEFAULT_TABLE,
};
use maintlog_core::storage::{open_local, StorageBackend, DEFAULT_SLOT};
use maintlog_core::{LoadPolicy, MaintlogError, RemoteConfig};

use crate::app::AppContext;
use crate::cli::InitArgs;
use crate::config::{default_data_dir, write_config, MaintlogConfig};
use crate::constants::API_KEY_ENV;
use crate::errors::CliError;
use crate::helpers::is_interactive;
use crate::ui::theme::{styled, styles};
use crate::ui::{hint, print, receipt, UiContext};

const REMOTE_KINDS: [&str; 4] = ["none", "rest", "document", "script"];
const BACKENDS: [&str; 2] = ["file", "sqlite"];
const POLICIES: [&str; 3] = ["mirror_only", "merge", "remote_authoritative"];

/// Print a step indicator for the wizard flow.
fn print_step(ctx: &UiContext, step: usize, total: usize, title: &str, detail: Option<&str>) {
    if !ctx.mode.is_pretty() {
        return;
    }
    let progress = format!("{}/{}", step, total);
    let progress_styled = styled(&progress, styles::dim(), ctx.color);
    let title_styled = styled(title, styles::bold(), ctx.color);
    println!("{}  {}", progress_styled, title_styled);
    if let Some(text) = detail {
        println!("    {}", styled(text, styles::dim(), ctx.color));
    }
}

/// Remote settings collected from flags or prompts.
#[derive(Debug, Default)]
struct RemoteParts {
    kind: String,
    url: Option<String>,
    api_key: Option<String>,
    table: Option<String>,
    bucket: Option<String>,
    collection: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn remote_config(parts: RemoteParts) -> anyhow::Result<RemoteConfig> {
    let kind = parts.kind.trim().to_ascii_lowercase();
    if kind == "none" || kind.is_empty() {
        return Ok(RemoteConfig::None);
    }
    if !REMOTE_KINDS.contains(&kind.as_str()) {
        return Err(CliError::invalid_input(format!(
            "Unknown remote kind \"{}\" (expected none, rest, document or script)",
            kind
        ))
        .into());
    }
    let url = non_blank(parts.url).ok_or_else(|| {
        CliError::invalid_input(format!("--url is required for the {} remote", kind))
    })?;

    Ok(match kind.as_str() {
        "rest" => RemoteConfig::Rest {
            url,
            api_key: non_blank(parts.api_key),
            table: non_blank(parts.table).unwrap_or_else(|| DEFAULT_TABLE.to_string()),
            bucket: non_blank(parts.bucket).unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
        },
        "document" => RemoteConfig::Document {
            url,
            api_key: non_blank(parts.api_key),
            collection: non_blank(parts.collection)
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
        },
        _ => RemoteConfig::Script { url },
    })
}

pub fn handle_init(ctx: &AppContext<'_>, args: &InitArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(false, None);
    let config_path = ctx.config_path()?;
    if config_path.exists() && !args.force {
        return Err(CliError::invalid_input(format!(
            "Config already exists at {}\nHint: Use --force to overwrite it.",
            config_path.display()
        ))
        .into());
    }

    let interactive = is_interactive(args.no_input);
    let theme = ColorfulTheme::default();
    let default_dir = default_data_dir()?;

    // Step 1: local storage
    let backend = match args.backend.as_deref() {
        Some(value) => value.parse::<StorageBackend>()?,
        None if interactive => {
            print_step(
                &ui_ctx,
                1,
                4,
                "Local storage",
                Some("Records are always saved here first."),
            );
            let choice = Select::with_theme(&theme)
                .with_prompt("Backend")
                .default(0)
                .items(&BACKENDS)
                .interact()?;
            BACKENDS[choice].parse::<StorageBackend>()?
        }
        None => StorageBackend::default(),
    };
    let requested_dir = args.data_dir.clone().or_else(|| ctx.cli().store.clone());
    let data_dir: Option<PathBuf> = match requested_dir {
        Some(path) => Some(path),
        None if interactive => {
            let input: String = Input::with_theme(&theme)
                .with_prompt("Data directory")
                .default(default_dir.to_string_lossy().to_string())
                .interact_text()?;
            let path = PathBuf::from(input.trim());
            (path != default_dir).then_some(path)
        }
        None => None,
    };
    let slot = non_blank(args.slot.clone()).unwrap_or_else(|| DEFAULT_SLOT.to_string());

    // Step 2: remote mirror
    let mut parts = RemoteParts {
        kind: args.remote.clone().unwrap_or_default(),
        url: args.url.clone(),
        api_key: args.api_key.clone(),
        table: args.table.clone(),
        bucket: args.bucket.clone(),
        collection: args.collection.clone(),
    };
    if parts.kind.is_empty() && interactive {
        print_step(
            &ui_ctx,
            2,
            4,
            "Remote mirror",
            Some("Optional. Failures never block local saves."),
        );
        let choice = Select::with_theme(&theme)
            .with_prompt("Remote backend")
            .default(0)
            .items(&REMOTE_KINDS)
            .interact()?;
        parts.kind = REMOTE_KINDS[choice].to_string();
        if parts.kind != "none" {
            if parts.url.is_none() {
                parts.url = Some(
                    Input::with_theme(&theme)
                        .with_prompt("Remote URL")
                        .interact_text()?,
                );
            }
            if parts.kind != "script" && parts.api_key.is_none() {
                let key: String = Input::with_theme(&theme)
                    .with_prompt(format!("API key (blank to use {})", API_KEY_ENV))
                    .allow_empty(true)
                    .interact_text()?;
                parts.api_key = Some(key);
            }
        }
    }
    let remote = remote_config(parts)?;

    // Reject unusable remote settings before writing anything.
    remote::build(
        &remote.clone().with_api_key_fallback(std::env::var(API_KEY_ENV).ok()),
        &RemoteOptions::default(),
    )?;

    // Step 3: load policy
    let load_policy = match args.load_policy.as_deref() {
        Some(value) => value.parse::<LoadPolicy>()?,
        None if interactive && !remote.is_none() => {
            print_step(
                &ui_ctx,
                3,
                4,
                "Load policy",
                Some("How remote records combine with local ones."),
            );
            let choice = Select::with_theme(&theme)
                .with_prompt("Load policy")
                .default(0)
                .items(&POLICIES)
                .interact()?;
            POLICIES[choice].parse::<LoadPolicy>()?
        }
        None => LoadPolicy::default(),
    };

    // Step 4: user
    let user = match non_blank(args.user.clone()) {
        Some(name) => name,
        None if interactive => {
            print_step(
                &ui_ctx,
                4,
                4,
                "User",
                Some("Stamped as created_by on new records."),
            );
            let name: String = Input::with_theme(&theme)
                .with_prompt("Your name")
                .default(maintlog_core::record::DEFAULT_CREATED_BY.to_string())
                .interact_text()?;
            name.trim().to_string()
        }
        None => maintlog_core::record::DEFAULT_CREATED_BY.to_string(),
    };

    let mut config = MaintlogConfig::default();
    config.storage.backend = backend;
    config.storage.path = data_dir
        .as_ref()
        .map(|path| path.to_string_lossy().to_string());
    config.storage.slot = slot;
    config.remote = remote;
    config.sync.load_policy = load_policy;
    config.user.name = user;

    let resolved_dir = data_dir.unwrap_or(default_dir);
    std::fs::create_dir_all(&resolved_dir).map_err(MaintlogError::from)?;
    open_local(config.storage.backend, &resolved_dir, &config.storage.slot)?;
    write_config(&config_path, &config)?;

    if !ctx.quiet() {
        if interactive {
            println!();
        }
        let config_display = config_path.display().to_string();
        let storage_display = format!("{} ({})", resolved_dir.display(), backend.as_str());
        print(
            &ui_ctx,
            &receipt(
                &ui_ctx,
                "Maintlog initialized",
                &[
                    ("Config", &config_display),
                    ("Storage", &storage_display),
                    ("Remote", config.remote.kind()),
                    ("Load policy", config.sync.load_policy.as_str()),
                ],
            ),
        );
        if ui_ctx.mode.is_pretty() {
            print(
                &ui_ctx,
                &hint(
                    &ui_ctx,
                    "maintlog add --machine <name> --section <section> --sub-part <area>",
                ),
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_policy_choice_is_the_default() {
        assert_eq!(POLICIES[0].parse::<LoadPolicy>().unwrap(), LoadPolicy::default());
        for policy in POLICIES {
            assert!(policy.parse::<LoadPolicy>().is_ok());
        }
    }

    #[test]
    fn test_remote_config_none() {
        let config = remote_config(RemoteParts {
            kind: "none".to_string(),
            ..RemoteParts::default()
        })
        .unwrap();
        assert!(config.is_none());
    }

    #[test]
    fn test_remote_config_requires_url() {
        let err = remote_config(RemoteParts {
            kind: "script".to_string(),
            ..RemoteParts::default()
        })
        .unwrap_err();
        assert!(err.to_string().contains("--url"));
    }

    #[test]
    fn test_remote_config_rest_defaults() {
        let config = remote_config(RemoteParts {
            kind: "REST".to_string(),
            url: Some("https://db.example.com".to_string()),
            api_key: Some("  ".to_string()),
            ..RemoteParts::default()
        })
        .unwrap();
        assert_eq!(
            config,
            RemoteConfig::Rest {
                url: "https://db.example.com".to_string(),
                api_key: None,
                table: DEFAULT_TABLE.to_string(),
                bucket: DEFAULT_BUCKET.to_string(),
            }
        );
    }

    #[test]
    fn test_remote_config_unknown_kind() {
        let err = remote_config(RemoteParts {
            kind: "ftp".to_string(),
            url: Some("https://x".to_string()),
            ..RemoteParts::default()
        })
        .unwrap_err();
        assert!(err.downcast_ref::<CliError>().is_some());
    }
}
