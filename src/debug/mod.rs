//! Debug bundle writer for inspecting the last submission.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::config::ApiConfig;
use crate::controller::{FormController, ResultView};
use crate::error::{AppError, EXIT_REMOTE};
use crate::render::html;

/// Write a markdown bundle under `debug/` and return its path.
pub fn write_debug_bundle(config: &ApiConfig, controller: &FormController) -> Result<PathBuf, AppError> {
    write_debug_bundle_in(Path::new("debug"), config, controller)
}

pub fn write_debug_bundle_in(
    dir: &Path,
    config: &ApiConfig,
    controller: &FormController,
) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(EXIT_REMOTE, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("clarity_debug_{ts}.md"));

    let mut file = File::create(&path)
        .map_err(|e| AppError::new(EXIT_REMOTE, format!("Failed to create debug file: {e}")))?;
    write_bundle(&mut file, config, controller)
        .map_err(|e| AppError::new(EXIT_REMOTE, format!("Failed to write debug bundle: {e}")))?;

    info!(path = %path.display(), "wrote debug bundle");
    Ok(path)
}

fn write_bundle(out: &mut impl Write, config: &ApiConfig, controller: &FormController) -> std::io::Result<()> {
    writeln!(out, "# clarity debug bundle")?;
    writeln!(out, "- generated: {}", Local::now().to_rfc3339())?;
    writeln!(out, "- endpoint: {}", config.decision_endpoint())?;
    writeln!(out, "- timeout_secs: {}", config.timeout.as_secs())?;
    writeln!(out, "- state: {:?}", controller.state())?;

    let form = controller.form();
    writeln!(out, "\n## Form fields")?;
    writeln!(out, "```text")?;
    writeln!(out, "decision_type: {:?}", form.decision_type)?;
    writeln!(out, "context: {:?}", form.context)?;
    writeln!(out, "constraints: {:?}", form.constraints)?;
    writeln!(out, "preferences: {:?}", form.preferences)?;
    writeln!(out, "```")?;

    writeln!(out, "\n## Last request")?;
    match controller.last_request() {
        Some(request) => {
            let json = serde_json::to_string_pretty(&request.envelope()).map_err(std::io::Error::other)?;
            writeln!(out, "```json\n{json}\n```")?;
        }
        None => writeln!(out, "none")?,
    }

    writeln!(out, "\n## Last outcome")?;
    match controller.last_outcome() {
        Some(Ok(response)) => {
            let json = serde_json::to_string_pretty(response).map_err(std::io::Error::other)?;
            writeln!(out, "```json\n{json}\n```")?;
        }
        Some(Err(err)) => writeln!(out, "error: {err}")?,
        None => writeln!(out, "none")?,
    }

    writeln!(out, "\n## Result region")?;
    let fragment = match controller.view() {
        ResultView::Empty => String::from("(empty)\n"),
        ResultView::Result(card) => html::result_card(card),
        ResultView::Error(card) => html::error_card(card),
    };
    writeln!(out, "```html\n{}```", fragment)?;

    Ok(())
}
