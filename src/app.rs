//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - resolves the service configuration
//! - sets up logging for the chosen front-end
//! - dispatches to the TUI or a one-shot command

use clap::Parser;
use tracing::info;

use crate::api::DecisionClient;
use crate::cli::{Command, ConnArgs, DecideArgs};
use crate::config::ApiConfig;
use crate::error::AppError;
use crate::logging::{self, LogTarget};

pub mod pipeline;

/// Entry point for the `clarity` binary.
pub fn run() -> Result<(), AppError> {
    // `clarity` and `clarity --api-base-url X` behave like `clarity tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Decide(args) => handle_decide(args),
        Command::Health(args) => handle_health(args),
    }
}

fn client_from_args(args: &ConnArgs) -> Result<DecisionClient, AppError> {
    let config = ApiConfig::resolve(args.api_base_url.as_deref(), args.timeout_secs)?;
    info!(base_url = config.base_url(), "using decision service");
    DecisionClient::new(config)
}

fn handle_tui(args: ConnArgs) -> Result<(), AppError> {
    logging::init(LogTarget::File)?;
    let client = client_from_args(&args)?;
    crate::tui::run(client)
}

fn handle_decide(args: DecideArgs) -> Result<(), AppError> {
    logging::init(LogTarget::Stderr)?;
    let form = pipeline::form_from_args(&args)?;
    let client = client_from_args(&args.conn)?;

    match pipeline::run_decide(&client, form, args.format) {
        Ok(out) => {
            println!("{out}");
            Ok(())
        }
        Err((out, err)) => {
            if !out.is_empty() {
                println!("{out}");
            }
            Err(err.into())
        }
    }
}

fn handle_health(args: ConnArgs) -> Result<(), AppError> {
    logging::init(LogTarget::Stderr)?;
    let client = client_from_args(&args)?;
    let health = client.health()?;
    let pretty = serde_json::to_string_pretty(&health).unwrap_or_else(|_| health.to_string());
    println!("{pretty}");
    Ok(())
}

/// Rewrite argv so `clarity` defaults to `clarity tui`.
///
/// Rules:
/// - `clarity`                      -> `clarity tui`
/// - `clarity --api-base-url X ...` -> `clarity tui --api-base-url X ...`
/// - `clarity --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "decide" | "health");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}
