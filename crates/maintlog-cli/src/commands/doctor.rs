//! `maintlog doctor`: configuration, local slot and remote checks.

use maintlog_core::storage::open_local;

use crate::app::AppContext;
use crate::cli::DoctorArgs;
use crate::output::print_json;
use crate::ui::{badge, header, kv, print, Badge};

/// Outcome of one diagnostic check.
struct Check {
    name: &'static str,
    badge: Badge,
    detail: String,
}

impl Check {
    fn new(name: &'static str, badge: Badge, detail: impl Into<String>) -> Self {
        Self {
            name,
            badge,
            detail: detail.into(),
        }
    }

    fn status(&self) -> &'static str {
        match self.badge {
            Badge::Ok => "ok",
            Badge::Warn => "warn",
            Badge::Err => "error",
            Badge::Info => "info",
        }
    }
}

pub async fn handle_doctor(ctx: &AppContext<'_>, args: &DoctorArgs) -> anyhow::Result<()> {
    let ui_ctx = ctx.ui_context(args.json, None);
    let mut checks = Vec::new();

    let config_path = ctx.config_path()?;
    let config = match ctx.config() {
        Ok(config) => {
            let detail = if config_path.exists() {
                config_path.display().to_string()
            } else {
                format!("{} (missing, using defaults)", config_path.display())
            };
            let kind = if config_path.exists() {
                Badge::Ok
            } else {
                Badge::Info
            };
            checks.push(Check::new("config", kind, detail));
            Some(config)
        }
        Err(err) => {
            checks.push(Check::new("config", Badge::Err, err.to_string()));
            None
        }
    };

    if let Some(config) = config {
        let dir = ctx.data_dir()?;
        match open_local(config.storage.backend, &dir, &config.storage.slot) {
            Ok(local) => {
                let count = local.read_all().len();
                checks.push(Check::new(
                    "local",
                    Badge::Ok,
                    format!("{} ({} records)", local.describe(), count),
                ));
            }
            Err(err) => checks.push(Check::new("local", Badge::Err, err.to_string())),
        }

        match ctx.remote() {
            Ok(remote) if !remote.is_enabled() => {
                let detail = if ctx.cli().offline {
                    "disabled (--offline)"
                } else {
                    "none configured"
                };
                checks.push(Check::new("remote", Badge::Info, detail));
            }
            Ok(remote) => match remote.get_all().await {
                Ok(records) => checks.push(Check::new(
                    "remote",
                    Badge::Ok,
                    format!("{} reachable ({} records)", remote.name(), records.len()),
                )),
                Err(err) => checks.push(Check::new(
                    "remote",
                    Badge::Warn,
                    format!("{} unreachable: {}", remote.name(), err),
                )),
            },
            Err(err) => checks.push(Check::new("remote", Badge::Err, err.to_string())),
        }
    }

    let failed = checks.iter().any(|c| c.badge == Badge::Err);

    if ui_ctx.mode.is_json() {
        let items: Vec<serde_json::Value> = checks
            .iter()
            .map(|c| {
                serde_json::json!({
                    "check": c.name,
                    "status": c.status(),
                    "detail": c.detail,
                })
            })
            .collect();
        print_json(&serde_json::json!({ "ok": !failed, "checks": items }))?;
    } else if !ctx.quiet() || failed {
        if ui_ctx.mode.is_pretty() {
            print(&ui_ctx, &header(&ui_ctx, "doctor", None));
            for check in &checks {
                print(
                    &ui_ctx,
                    &badge(&ui_ctx, check.badge, &format!("{}: {}", check.name, check.detail)),
                );
            }
        } else {
            for check in &checks {
                print(
                    &ui_ctx,
                    &kv(&ui_ctx, check.name, &format!("{} {}", check.status(), check.detail)),
                );
            }
        }
    }

    if failed {
        return Err(anyhow::anyhow!(
            "Doctor found problems\nHint: Fix the failing checks above, or run `maintlog init --force`."
        ));
    }
    Ok(())
}
