//! Display-ready view models for the result region, plus the text and HTML
//! renderers used outside the TUI.
//!
//! Formatting lives here so the controller and the TUI never format numbers
//! or escape text themselves.

pub mod escape;
pub mod html;
pub mod text;

use crate::domain::DecisionResponse;
use crate::error::DecisionError;

pub const RESULT_TITLE: &str = "AI Decision Result";
pub const ERROR_TITLE: &str = "Error Processing Decision";
pub const ERROR_HINT: &str =
    "Please check your inputs and try again, or contact support if the problem persists.";

/// Successful recommendation, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultCard {
    pub recommendation: String,
    pub reasoning: Vec<String>,
    pub confidence: f64,
    /// `"50.0%"` for 0.5.
    pub confidence_label: String,
    /// Bar fill in percent, rounded to one decimal place.
    pub bar_width: f64,
    pub alternative: Option<String>,
}

impl ResultCard {
    pub fn from_response(response: &DecisionResponse) -> Self {
        let confidence = response.confidence_score.clamp(0.0, 1.0);
        Self {
            recommendation: response.recommendation.clone(),
            reasoning: response.reasoning.clone(),
            confidence,
            confidence_label: format!("{:.1}%", confidence * 100.0),
            bar_width: (confidence * 1000.0).round() / 10.0,
            alternative: response.alternative().map(str::to_string),
        }
    }

    /// Bar width as a CSS length, e.g. `50%` or `57.5%`.
    pub fn bar_css_width(&self) -> String {
        format!("{}%", self.bar_width)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCard {
    pub message: String,
}

impl ErrorCard {
    pub fn from_error(err: &DecisionError) -> Self {
        let message = err.to_string();
        Self {
            message: if message.trim().is_empty() {
                "An unknown error occurred".to_string()
            } else {
                message
            },
        }
    }
}
