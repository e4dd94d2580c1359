use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;

use maintlog_core::VERSION;

/// Maintlog - a local-first maintenance log for shop-floor machines
#[derive(Parser)]
#[command(name = "maintlog")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true, env = "MAINTLOG_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Data directory holding the local slot (overrides the config)
    #[arg(long, global = true, env = "MAINTLOG_STORE", value_name = "PATH")]
    pub store: Option<PathBuf>,

    /// Skip the remote backend for this invocation
    #[arg(long, global = true)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Use ASCII symbols and table borders
    #[arg(long, global = true)]
    pub ascii: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the configuration file
    Init(InitArgs),

    /// Record a maintenance job
    Add(AddArgs),

    /// List maintenance records, newest first
    List(ListArgs),

    /// Search by machine, operator, section or sub-part
    Search(SearchArgs),

    /// Show one record
    Show(ShowArgs),

    /// Resubmit the form for an existing record
    Edit(EditArgs),

    /// Delete a record
    Delete(DeleteArgs),

    /// Export every record as CSV, JSON or JSONL
    Export(ExportArgs),

    /// Print the columnar maintenance report
    Report(ReportArgs),

    /// Check configuration, local slot and remote
    Doctor(DoctorArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,

    /// Local backend (file, sqlite)
    #[arg(long, value_name = "BACKEND")]
    pub backend: Option<String>,

    /// Data directory for the local slot
    #[arg(long, value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Slot name
    #[arg(long)]
    pub slot: Option<String>,

    /// Remote backend (none, rest, document, script)
    #[arg(long, value_name = "KIND")]
    pub remote: Option<String>,

    /// Remote base URL
    #[arg(long)]
    pub url: Option<String>,

    /// Remote API key (or set MAINTLOG_REMOTE_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Relational table name
    #[arg(long)]
    pub table: Option<String>,

    /// Object storage bucket for attachments
    #[arg(long)]
    pub bucket: Option<String>,

    /// Document collection name
    #[arg(long)]
    pub collection: Option<String>,

    /// Load policy (mirror_only, merge, remote_authoritative)
    #[arg(long, value_name = "POLICY")]
    pub load_policy: Option<String>,

    /// Name stamped on new records
    #[arg(long)]
    pub user: Option<String>,
}

/// Form fields shared by `add` and `edit`
#[derive(Args, Default)]
pub struct FormArgs {
    /// Machine name
    #[arg(long)]
    pub machine: Option<String>,

    /// Machine section
    #[arg(long)]
    pub section: Option<String>,

    /// Sub-part area
    #[arg(long)]
    pub sub_part: Option<String>,

    /// Machine details
    #[arg(long)]
    pub details: Option<String>,

    /// Operator name
    #[arg(long)]
    pub operator: Option<String>,

    /// Maintenance staff
    #[arg(long)]
    pub staff: Option<String>,

    /// Duration in hours
    #[arg(long, value_name = "HOURS")]
    pub hours: Option<f64>,

    /// Work description
    #[arg(long)]
    pub description: Option<String>,

    /// Mark as needing external repair
    #[arg(long)]
    pub external: bool,

    /// External repair vendor (implies --external)
    #[arg(long)]
    pub vendor: Option<String>,

    /// External repair duration in days (implies --external)
    #[arg(long, value_name = "DAYS")]
    pub external_days: Option<u32>,

    /// Material line (name:needed[:available]), repeatable
    #[arg(short, long, value_name = "MATERIAL")]
    pub material: Vec<String>,

    /// Image to attach
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Vendor quotation to attach
    #[arg(long, value_name = "FILE")]
    pub quotation: Option<PathBuf>,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub form: FormArgs,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,

    /// Print the created record as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Record ID (full or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    #[command(flatten)]
    pub form: FormArgs,

    /// Clear the external repair fields
    #[arg(long, conflicts_with_all = ["external", "vendor", "external_days"])]
    pub no_external: bool,

    /// Drop every material line before adding new ones
    #[arg(long)]
    pub clear_materials: bool,

    /// Remove the attached image
    #[arg(long, conflicts_with = "image")]
    pub clear_image: bool,

    /// Remove the attached quotation
    #[arg(long, conflicts_with = "quotation")]
    pub clear_quotation: bool,

    /// Print the updated record as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command
#[derive(Args)]
pub struct ListArgs {
    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Show every record
    #[arg(long, conflicts_with = "limit")]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `search` command
#[derive(Args)]
pub struct SearchArgs {
    /// Search term
    #[arg(value_name = "TERM")]
    pub term: String,

    /// Limit number of results
    #[arg(long)]
    pub limit: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `show` command
#[derive(Args)]
pub struct ShowArgs {
    /// Record ID (full or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Record ID (full or unique prefix)
    #[arg(value_name = "ID")]
    pub id: String,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the `export` command
#[derive(Args)]
pub struct ExportArgs {
    /// Output format (csv, json, jsonl)
    #[arg(long, default_value = "csv")]
    pub format: String,

    /// Write to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the `report` command
#[derive(Args)]
pub struct ReportArgs {
    /// Only include records matching this search term
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `doctor` command
#[derive(Args)]
pub struct DoctorArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command
#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_name = "SHELL")]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_add_collects_repeated_materials() {
        let cli = Cli::parse_from([
            "maintlog",
            "add",
            "--machine",
            "Press-1",
            "-m",
            "Bearing:2:1",
            "--material",
            "Grease:1",
        ]);
        match cli.command {
            Some(Commands::Add(args)) => {
                assert_eq!(args.form.machine.as_deref(), Some("Press-1"));
                assert_eq!(args.form.material, vec!["Bearing:2:1", "Grease:1"]);
            }
            _ => panic!("expected add command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["maintlog", "list", "--offline", "-vv", "--ascii"]);
        assert!(cli.offline);
        assert!(cli.ascii);
        assert_eq!(cli.verbose, 2);
    }
}
