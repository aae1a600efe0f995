//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use contracts::InputFormat;
use std::path::PathBuf;

/// Contact Distributor - spread uploaded contact sheets across workers
#[derive(Parser, Debug)]
#[command(
    name = "contact-distributor",
    author,
    version,
    about = "Upload contact sheets and distribute them round-robin across workers",
    long_about = "Reads a CSV or spreadsheet of contacts, keeps rows with a FirstName \n\
                  and Phone, assigns them round-robin to the registered workers and \n\
                  stores the resulting assignment."
)]
pub struct Cli {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        global = true,
        default_value = "config.toml",
        env = "CONTACT_DISTRIBUTOR_CONFIG"
    )]
    pub config: PathBuf,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "CONTACT_DISTRIBUTOR_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "CONTACT_DISTRIBUTOR_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Upload a contact file and distribute it across workers
    Upload(UploadArgs),

    /// List stored assignments
    Lists(ListsArgs),

    /// Show the current worker snapshot
    Workers(WorkersArgs),

    /// Validate configuration file
    Validate(ValidateArgs),
}

/// Arguments for the `upload` command
#[derive(Parser, Debug, Clone)]
pub struct UploadArgs {
    /// Contact file to upload (.csv, .xlsx, .xls, .ods)
    #[arg(short, long)]
    pub file: PathBuf,

    /// Input format (sniffed from the file extension when omitted)
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Override the maximum accepted upload size in bytes
    #[arg(long, env = "CONTACT_DISTRIBUTOR_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: Option<u64>,

    /// Metrics server port (overrides configuration)
    #[arg(long, env = "CONTACT_DISTRIBUTOR_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Output result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `lists` command
#[derive(Parser, Debug)]
pub struct ListsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show every contact, not just per-worker counts
    #[arg(long)]
    pub items: bool,
}

/// Arguments for the `workers` command
#[derive(Parser, Debug)]
pub struct WorkersArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Declared input format
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
    /// Comma-separated values
    Csv,
    /// Excel / OpenDocument workbook (first sheet)
    Spreadsheet,
}

impl From<FormatArg> for InputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => InputFormat::Delimited,
            FormatArg::Spreadsheet => InputFormat::Spreadsheet,
        }
    }
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => observability::LogFormat::Json,
            LogFormat::Pretty => observability::LogFormat::Pretty,
            LogFormat::Compact => observability::LogFormat::Compact,
        }
    }
}
