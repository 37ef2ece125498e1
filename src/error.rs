//! Error types.
//!
//! Two layers:
//!
//! - [`DecisionError`] classifies everything that can go wrong in one
//!   validate -> build -> submit -> render cycle. None of it is fatal; the
//!   controller turns it into an error card.
//! - [`AppError`] is the process boundary: a message plus the exit code the
//!   binary returns.

use thiserror::Error;

/// Exit code for configuration and user-input problems.
pub const EXIT_INPUT: u8 = 2;
/// Exit code for network and response problems.
pub const EXIT_REMOTE: u8 = 4;

/// A single failed form rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    MissingDecisionType,
    MissingContext,
    InvalidPreferences,
    PreferencesNotObject,
}

impl Violation {
    pub fn message(self) -> &'static str {
        match self {
            Violation::MissingDecisionType => "Decision type is required",
            Violation::MissingContext => "Context is required",
            Violation::InvalidPreferences => "Preferences must be valid JSON",
            Violation::PreferencesNotObject => "Preferences must be a JSON object",
        }
    }
}

/// Every rule the form failed, in check order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.lines().join("\n"))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn lines(&self) -> Vec<&'static str> {
        self.violations.iter().map(|v| v.message()).collect()
    }

    pub fn contains(&self, violation: Violation) -> bool {
        self.violations.contains(&violation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// Non-2xx response. `reason` is the canonical reason phrase, if any.
    #[error("API request failed: {}", status_line(*code, reason))]
    Status { code: u16, reason: String },
    #[error("API request failed: {0}")]
    Transport(String),
    #[error("API request timed out after {0}s")]
    Timeout(u64),
}

/// `"500 Internal Server Error"`, or just `"599"` when there is no reason.
fn status_line(code: u16, reason: &str) -> String {
    match reason.trim() {
        "" => code.to_string(),
        reason => format!("{code} {reason}"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error("Invalid response from decision service: {0}")]
    ResponseParse(String),
    #[error("A decision request is already in progress")]
    InFlight,
}

impl DecisionError {
    pub fn exit_code(&self) -> u8 {
        match self {
            DecisionError::Validation(_) | DecisionError::InFlight => EXIT_INPUT,
            DecisionError::Network(_) | DecisionError::ResponseParse(_) => EXIT_REMOTE,
        }
    }

    /// Stable machine-readable name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            DecisionError::Validation(_) => "validation",
            DecisionError::Network(_) => "network",
            DecisionError::ResponseParse(_) => "response",
            DecisionError::InFlight => "in_flight",
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<DecisionError> for AppError {
    fn from(err: DecisionError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
