//! Runtime configuration: where the decision service lives and how long to
//! wait for it.
//!
//! Values are read once at startup. Precedence: command-line flag, then the
//! process environment (a `.env` file is loaded first), then the defaults.

use std::time::Duration;

use reqwest::Url;

use crate::error::{AppError, EXIT_INPUT};

pub const ENV_BASE_URL: &str = "CLARITY_API_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "CLARITY_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const DECISION_PATH: &str = "/api/decision";
pub const HEALTH_PATH: &str = "/health";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Validate and normalize a base URL (trailing `/` trimmed).
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, AppError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let url = Url::parse(trimmed)
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid API base URL '{trimmed}': {e}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::new(
                EXIT_INPUT,
                format!("API base URL must use http or https, got '{}'.", url.scheme()),
            ));
        }
        if timeout_secs == 0 {
            return Err(AppError::new(EXIT_INPUT, "Timeout must be at least one second."));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Resolve from optional overrides, falling back to the environment.
    pub fn resolve(base_url: Option<&str>, timeout_secs: Option<u64>) -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::resolve_with(base_url, timeout_secs, |key| std::env::var(key).ok())
    }

    fn resolve_with(
        base_url: Option<&str>,
        timeout_secs: Option<u64>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AppError> {
        let base_url = match base_url {
            Some(url) => url.to_string(),
            None => env(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        };

        let timeout_secs = match timeout_secs {
            Some(secs) => secs,
            None => match env(ENV_TIMEOUT_SECS) {
                Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                    AppError::new(EXIT_INPUT, format!("Invalid {ENV_TIMEOUT_SECS} '{raw}': {e}"))
                })?,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };

        Self::new(&base_url, timeout_secs)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn decision_endpoint(&self) -> String {
        format!("{}{DECISION_PATH}", self.base_url)
    }

    pub fn health_endpoint(&self) -> String {
        format!("{}{HEALTH_PATH}", self.base_url)
    }
}
