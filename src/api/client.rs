//! Blocking client for `POST {base}/api/decision` and `GET {base}/health`.

use reqwest::blocking::{Client, Response};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ApiConfig;
use crate::domain::{DecisionRequest, DecisionResponse, parse_response};
use crate::error::{AppError, DecisionError, EXIT_INPUT, NetworkError};

const JSON: &str = "application/json";

/// Anything that can turn a request into a recommendation.
///
/// The controller only depends on this seam, so it can be driven by the HTTP
/// client or by a canned service in tests.
pub trait DecisionService {
    fn submit(&self, request: &DecisionRequest) -> Result<DecisionResponse, DecisionError>;
}

#[derive(Debug, Clone)]
pub struct DecisionClient {
    client: Client,
    config: ApiConfig,
}

impl DecisionClient {
    pub fn new(config: ApiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Fetch the service's health document.
    pub fn health(&self) -> Result<Value, DecisionError> {
        let url = self.config.health_endpoint();
        debug!(%url, "health check");

        let resp = self
            .client
            .get(&url)
            .header(ACCEPT, JSON)
            .send()
            .map_err(|e| self.transport_error(e))?;
        let body = self.read_success_body(resp)?;

        serde_json::from_str(&body)
            .map_err(|e| DecisionError::ResponseParse(format!("body is not valid JSON: {e}")))
    }

    /// Read the body of a 2xx response; any other status becomes
    /// [`NetworkError::Status`].
    fn read_success_body(&self, resp: Response) -> Result<String, DecisionError> {
        let status = resp.status();
        if !status.is_success() {
            // The blocking response does not expose the raw reason phrase.
            let reason = status.canonical_reason().unwrap_or_default().to_string();
            warn!(code = status.as_u16(), %reason, "decision service returned an error status");
            return Err(NetworkError::Status {
                code: status.as_u16(),
                reason,
            }
            .into());
        }
        resp.text().map_err(|e| self.transport_error(e))
    }

    fn transport_error(&self, err: reqwest::Error) -> DecisionError {
        if err.is_timeout() {
            NetworkError::Timeout(self.config.timeout.as_secs()).into()
        } else {
            NetworkError::Transport(error_chain(&err)).into()
        }
    }
}

/// The error's message plus its innermost cause, unless the cause is
/// already part of the message.
fn error_chain(err: &dyn std::error::Error) -> String {
    let message = err.to_string();
    let mut root = err;
    while let Some(source) = root.source() {
        root = source;
    }
    let cause = root.to_string();
    if cause.is_empty() || message.contains(&cause) {
        message
    } else {
        format!("{message}: {cause}")
    }
}

impl DecisionService for DecisionClient {
    fn submit(&self, request: &DecisionRequest) -> Result<DecisionResponse, DecisionError> {
        let url = self.config.decision_endpoint();
        info!(
            %url,
            decision_type = %request.decision_type,
            constraints = request.constraints.len(),
            "submitting decision request"
        );

        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, JSON)
            .header(ACCEPT, JSON)
            .json(&request.envelope())
            .send()
            .map_err(|e| self.transport_error(e))?;

        let body = self.read_success_body(resp)?;
        let (response, shape) = parse_response(&body)?;
        debug!(?shape, "decision response parsed");
        Ok(response)
    }
}
