//! Maintlog CLI - a local-first maintenance log for shop-floor machines
//!
//! This is the command-line interface for Maintlog. It is the composition
//! root: it reads the configuration, builds the local slot and remote
//! adapter, and drives the record store from the core library.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod logging;
mod output;
mod ui;

use clap::Parser;
use maintlog_core::VERSION;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::commands::{doctor, init, misc, records};
use crate::errors::exit_code_for;
use crate::ui::print_error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);
    let ctx = AppContext::new(&cli);

    if let Err(e) = run(&ctx, &cli).await {
        let ui_ctx = ctx.ui_context(false, None);
        let (message, hint) = split_hint(&format!("{}", e));
        let hint = hint.or_else(|| contextual_hint(&message));
        print_error(&ui_ctx, &message, hint.as_deref());
        std::process::exit(exit_code_for(&e));
    }
}

/// Split an error message at an embedded "Hint:" line.
fn split_hint(error: &str) -> (String, Option<String>) {
    for marker in ["\nHint:", "\nhint:"] {
        if let Some(idx) = error.find(marker) {
            let hint = error[idx + marker.len()..].trim().to_string();
            return (error[..idx].to_string(), Some(hint));
        }
    }
    (error.to_string(), None)
}

/// Hints for common error patterns that carry none of their own.
fn contextual_hint(error: &str) -> Option<String> {
    let error_lower = error.to_lowercase();

    if error_lower.contains("record") && error_lower.contains("not found") {
        return Some("Run `maintlog list` to find record IDs.".to_string());
    }

    if error_lower.contains("ambiguous") {
        return Some("Use more characters of the record ID.".to_string());
    }

    if error_lower.contains("missing required field") {
        return Some("Pass --machine, --section and --sub-part.".to_string());
    }

    if error_lower.contains("duration must be") {
        return Some("--hours takes a number such as 1.5.".to_string());
    }

    if error_lower.contains("invalid material") {
        return Some("Materials look like `--material Bearing:2:1` (name:needed:available).".to_string());
    }

    if error_lower.contains("remote:") {
        return Some(
            "Check [remote] in the config file, set MAINTLOG_REMOTE_API_KEY, or pass --offline."
                .to_string(),
        );
    }

    if error_lower.contains("storage error") {
        return Some(
            "Check that the data directory is writable, or point --store at another one."
                .to_string(),
        );
    }

    None
}

async fn run(ctx: &AppContext<'_>, cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Some(Commands::Init(args)) => {
            init::handle_init(ctx, args)?;
        }
        Some(Commands::Add(args)) => {
            records::handle_add(ctx, args).await?;
        }
        Some(Commands::List(args)) => {
            records::handle_list(ctx, args).await?;
        }
        Some(Commands::Search(args)) => {
            records::handle_search(ctx, args).await?;
        }
        Some(Commands::Show(args)) => {
            records::handle_show(ctx, args).await?;
        }
        Some(Commands::Edit(args)) => {
            records::handle_edit(ctx, args).await?;
        }
        Some(Commands::Delete(args)) => {
            records::handle_delete(ctx, args).await?;
        }
        Some(Commands::Export(args)) => {
            records::handle_export(ctx, args).await?;
        }
        Some(Commands::Report(args)) => {
            records::handle_report(ctx, args).await?;
        }
        Some(Commands::Doctor(args)) => {
            doctor::handle_doctor(ctx, args).await?;
        }
        Some(Commands::Completions(args)) => {
            misc::handle_completions(args)?;
        }
        None => {
            println!("Maintlog v{}", VERSION);
            println!("\nQuickstart:");
            println!("  maintlog init");
            println!("  maintlog add --machine Press-1 --section \"Line A\" --sub-part Motor");
            println!("  maintlog list");
            println!("  maintlog search press");
            println!("  maintlog show <id>");
            println!("  maintlog export --format csv --output logs.csv");
            println!("\nRun `maintlog --help` for full usage.");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_hint() {
        let (message, hint) = split_hint("Record abc not found\nHint: Run `maintlog list`.");
        assert_eq!(message, "Record abc not found");
        assert_eq!(hint.as_deref(), Some("Run `maintlog list`."));

        let (message, hint) = split_hint("boom");
        assert_eq!(message, "boom");
        assert!(hint.is_none());
    }

    #[test]
    fn test_contextual_hints() {
        assert!(contextual_hint("Not found: maintenance record 42")
            .unwrap()
            .contains("maintlog list"));
        assert!(contextual_hint("Validation error: Missing required field(s): machine name")
            .unwrap()
            .contains("--machine"));
        assert!(contextual_hint("Invalid input: remote: rest backend requires an api_key")
            .unwrap()
            .contains("--offline"));
        assert!(contextual_hint("something else").is_none());
    }
}
