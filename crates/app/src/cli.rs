//! Command-line flags. Every flag overrides the matching environment
//! variable or `secrets.toml` entry.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};

#[derive(Parser)]
#[command(
    name = "impression-tracker",
    version,
    about = "Single-session opinion survey over recent news coverage"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Path to the secrets file holding API credentials.
    #[arg(long = "secrets", value_name = "PATH", default_value = "secrets.toml", global = true)]
    pub secrets: PathBuf,

    /// Subject the stories are searched for.
    #[arg(long = "topic", global = true)]
    pub topic: Option<String>,

    /// Maximum number of stories shown per session.
    #[arg(long = "sample-size", global = true)]
    pub sample_size: Option<usize>,

    /// Number of candidate stories requested per session.
    #[arg(long = "fetch-count", global = true)]
    pub fetch_count: Option<usize>,

    /// Store responses in this SQLite database instead of Supabase.
    #[arg(long = "db", value_name = "SQLITE_URL", global = true)]
    pub db: Option<String>,

    /// Directory the CSV export is written to.
    #[arg(long = "export-dir", value_name = "DIR", global = true)]
    pub export_dir: Option<PathBuf>,
}

#[derive(Subcommand, Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    /// Launch the desktop survey (default).
    Ui,
    /// Fetch and sample stories without starting the survey.
    Preview,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
