// topicorder CLI - reorder a JSON array of topic records by id

mod apply;
mod exit_codes;
mod init;
mod util;

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use topicorder_reorder::{load_document, MismatchPolicy, ReorderError};
use tracing_subscriber::EnvFilter;

use apply::Selection;
use exit_codes::{reorder_exit_code, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "topicorder")]
#[command(about = "Reorder a JSON list of topics by id and rewrite it in place")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). TOPICORDER_LOG overrides.
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reorder the document and write it back atomically
    #[command(after_help = "\
Without --config, ./topicorder.toml is used when present, otherwise the
built-in module order and src/data/topics.json.

Examples:
  topicorder apply
  topicorder apply --config course/topicorder.toml --backup
  topicorder apply -d topics.json --order singapore-p3,singapore-p4,hiroo
  topicorder apply --on-mismatch fail --dry-run --json")]
    Apply {
        /// Config file (default: ./topicorder.toml when present)
        #[arg(long, short = 'c', env = "TOPICORDER_CONFIG")]
        config: Option<PathBuf>,

        /// Document to rewrite (overrides the config)
        #[arg(long, short = 'd')]
        document: Option<PathBuf>,

        /// Ids in the desired order. Repeatable; comma-separated accepted.
        #[arg(long, value_name = "IDS")]
        order: Vec<String>,

        /// What to do when ids and records don't line up 1:1
        #[arg(long, value_name = "POLICY")]
        on_mismatch: Option<MismatchArg>,

        /// Keep the previous contents as <document>.bak
        #[arg(long)]
        backup: bool,

        /// Compute and report, but don't write
        #[arg(long)]
        dry_run: bool,

        /// Print a single JSON object on stdout
        #[arg(long)]
        json: bool,

        /// Suppress warnings and notes on stderr
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Check whether the document is already in order (exit 0 = in order, exit 1 = not)
    #[command(after_help = "\
Examples:
  topicorder check
  topicorder check -d topics.json --order b,a --json")]
    Check {
        /// Config file (default: ./topicorder.toml when present)
        #[arg(long, short = 'c', env = "TOPICORDER_CONFIG")]
        config: Option<PathBuf>,

        /// Document to check (overrides the config)
        #[arg(long, short = 'd')]
        document: Option<PathBuf>,

        /// Ids in the desired order. Repeatable; comma-separated accepted.
        #[arg(long, value_name = "IDS")]
        order: Vec<String>,

        /// Print a single JSON object on stdout
        #[arg(long)]
        json: bool,

        /// Only set the exit code
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// List ids and titles in their current order
    List {
        /// Document to read
        document: PathBuf,

        /// Identifier field name
        #[arg(long, default_value = "id")]
        id_field: String,

        /// Display field name
        #[arg(long, default_value = "title")]
        title_field: String,

        /// Print a JSON array of {id, title} on stdout
        #[arg(long)]
        json: bool,
    },

    /// Write a topicorder.toml capturing the document's current order
    #[command(after_help = "\
Examples:
  topicorder init
  topicorder init -d content/topics.json -o content/topicorder.toml")]
    Init {
        /// Document to read the current order from
        #[arg(long, short = 'd', default_value = topicorder_reorder::config::DEFAULT_DOCUMENT)]
        document: PathBuf,

        /// Config file to write
        #[arg(long, short = 'o', default_value = topicorder_reorder::config::DEFAULT_CONFIG_FILE)]
        output: PathBuf,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MismatchArg {
    Drop,
    Warn,
    Fail,
}

impl From<MismatchArg> for MismatchPolicy {
    fn from(arg: MismatchArg) -> Self {
        match arg {
            MismatchArg::Drop => MismatchPolicy::Drop,
            MismatchArg::Warn => MismatchPolicy::Warn,
            MismatchArg::Fail => MismatchPolicy::Fail,
        }
    }
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

/// Route `log` records to stderr. TOPICORDER_LOG takes an env-filter directive.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("TOPICORDER_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: topicorder <command> [options]");
            eprintln!("       topicorder --help for more information");
            Ok(())
        }
        Some(Commands::Apply {
            config,
            document,
            order,
            on_mismatch,
            backup,
            dry_run,
            json,
            quiet,
        }) => {
            let selection = Selection {
                config,
                document,
                order,
                on_mismatch: on_mismatch.map(MismatchPolicy::from),
                backup,
            };
            apply::cmd_apply(&selection, dry_run, json, quiet)
        }
        Some(Commands::Check {
            config,
            document,
            order,
            json,
            quiet,
        }) => {
            let selection = Selection {
                config,
                document,
                order,
                on_mismatch: None,
                backup: false,
            };
            apply::cmd_check(&selection, json, quiet)
        }
        Some(Commands::List {
            document,
            id_field,
            title_field,
            json,
        }) => cmd_list(document, &id_field, &title_field, json),
        Some(Commands::Init { document, output, force }) => init::cmd_init(document, output, force),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Exit with `code` and no message (the command already reported).
    pub fn silent(code: u8) -> Self {
        Self { code, message: String::new(), hint: None }
    }

    /// Create error from an engine error with the matching exit code.
    pub fn reorder(err: ReorderError) -> Self {
        let code = reorder_exit_code(&err);
        let hint = match &err {
            ReorderError::MissingId { field, .. } | ReorderError::IdNotString { field, .. } => {
                Some(format!("every record needs a string \"{field}\" field"))
            }
            ReorderError::NotAnArray { .. } => {
                Some("expected a top-level JSON array of topic objects".to_string())
            }
            ReorderError::Mismatch { .. } => Some(
                "add the ids to the order, or rerun with --on-mismatch warn to proceed".to_string(),
            ),
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReorderError> for CliError {
    fn from(err: ReorderError) -> Self {
        Self::reorder(err)
    }
}

/// Print one JSON value on stdout.
pub(crate) fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    let text = serde_json::to_string(value).map_err(|e| CliError::io(e.to_string()))?;
    println!("{}", text);
    Ok(())
}

// ============================================================================
// list
// ============================================================================

fn cmd_list(document: PathBuf, id_field: &str, title_field: &str, json: bool) -> Result<(), CliError> {
    let records = load_document(&document, id_field)?;

    if json {
        let rows: Vec<serde_json::Value> = records
            .iter()
            .map(|r| serde_json::json!({ "id": r.id, "title": r.title(title_field) }))
            .collect();
        return print_json(&serde_json::Value::Array(rows));
    }

    let id_width = records
        .iter()
        .map(|r| util::display_width(&r.id))
        .max()
        .unwrap_or(0)
        .clamp(2, 40);
    let num_width = records.len().to_string().len();

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for (i, record) in records.iter().enumerate() {
        writeln!(
            handle,
            "{:>num_width$}  {}  {}",
            i + 1,
            util::pad_right(&record.id, id_width),
            record.display_title(title_field),
        )
        .map_err(|e| CliError::io(e.to_string()))?;
    }
    Ok(())
}
