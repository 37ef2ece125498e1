//! Command-line parsing for the decision form client.
//!
//! Argument parsing and command dispatch stay separate from the form and
//! HTTP code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "clarity", version, about = "Terminal front-end for the Clarity decision service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive decision form.
    Tui(ConnArgs),
    /// Submit one decision from flags and print the result.
    Decide(DecideArgs),
    /// Query the service health endpoint.
    Health(ConnArgs),
}

/// Where to reach the decision service.
#[derive(Debug, Args, Clone, Default)]
pub struct ConnArgs {
    /// Base URL of the decision service (overrides CLARITY_API_BASE_URL).
    #[arg(long, value_name = "URL")]
    pub api_base_url: Option<String>,

    /// Request timeout in seconds (overrides CLARITY_TIMEOUT_SECS).
    #[arg(long, value_name = "SECS")]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Args, Clone)]
pub struct DecideArgs {
    #[command(flatten)]
    pub conn: ConnArgs,

    /// Kind of decision, e.g. `pick_db`.
    #[arg(short = 't', long = "type", default_value = "")]
    pub decision_type: String,

    /// Free-text context for the decision.
    #[arg(short = 'c', long, default_value = "")]
    pub context: String,

    /// A constraint; repeat for several.
    #[arg(long = "constraint", value_name = "TEXT")]
    pub constraints: Vec<String>,

    /// Read constraints from a file, one per line.
    #[arg(long, value_name = "FILE")]
    pub constraints_file: Option<PathBuf>,

    /// Preferences as a JSON object.
    #[arg(short = 'p', long, value_name = "JSON")]
    pub preferences: Option<String>,

    /// How to print the result.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Html,
    Json,
}
