//! Request/response shapes exchanged with the decision service.
//!
//! Both are transient: a request is built fresh per submission and a response
//! lives only long enough to be rendered.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::DecisionError;

/// Key under which the service nests its output in the wrapped (v1) shape.
pub const OUTPUT_KEY: &str = "decision_output";

/// Payload the form builds from its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionRequest {
    pub decision_type: String,
    pub context: String,
    pub constraints: Vec<String>,
    pub preferences: Map<String, Value>,
}

impl DecisionRequest {
    /// Wire body: `{"decision_input": ...}`.
    pub fn envelope(&self) -> RequestEnvelope<'_> {
        RequestEnvelope {
            decision_input: self,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RequestEnvelope<'a> {
    pub decision_input: &'a DecisionRequest,
}

/// Recommendation returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResponse {
    pub recommendation: String,
    pub reasoning: Vec<String>,
    pub confidence_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_option: Option<String>,
}

impl DecisionResponse {
    /// Alternative option, treating an empty string like an absent one.
    pub fn alternative(&self) -> Option<&str> {
        self.alternative_option
            .as_deref()
            .filter(|alt| !alt.trim().is_empty())
    }
}

/// Which of the two accepted response layouts the service used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// `{"decision_output": {...}}`
    Wrapped,
    /// The output object at the top level.
    Bare,
}

/// Parse a response body, discriminating between the wrapped and bare shapes.
///
/// An object carrying `decision_output` is always treated as wrapped; its
/// content must then be a complete response. Anything else that is an object
/// is treated as bare.
pub fn parse_response(body: &str) -> Result<(DecisionResponse, ResponseShape), DecisionError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| DecisionError::ResponseParse(format!("body is not valid JSON: {e}")))?;

    let Value::Object(mut obj) = value else {
        return Err(DecisionError::ResponseParse(
            "expected a JSON object".to_string(),
        ));
    };

    let (payload, shape) = match obj.remove(OUTPUT_KEY) {
        Some(inner) => (inner, ResponseShape::Wrapped),
        None => (Value::Object(obj), ResponseShape::Bare),
    };

    let response: DecisionResponse = serde_json::from_value(payload)
        .map_err(|e| DecisionError::ResponseParse(e.to_string()))?;

    let score = response.confidence_score;
    if !score.is_finite() || !(0.0..=1.0).contains(&score) {
        return Err(DecisionError::ResponseParse(format!(
            "confidence_score {score} is outside [0, 1]"
        )));
    }

    Ok((response, shape))
}
