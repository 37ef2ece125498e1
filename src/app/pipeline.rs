//! Shared "decide" pipeline used by the one-shot CLI.
//!
//! flags -> form fields -> validate -> build request -> submit -> render
//!
//! The TUI drives the same controller, but splits the submit step across a
//! worker thread so the screen keeps updating.

use std::fs;

use serde_json::json;

use crate::api::DecisionService;
use crate::cli::{DecideArgs, OutputFormat};
use crate::controller::{FormController, ResultView};
use crate::error::{AppError, DecisionError, EXIT_INPUT};
use crate::form::{EMPTY_PREFERENCES, Field, FormState};
use crate::render::{html, text};

/// Fill the form the way a user would have typed it.
pub fn form_from_args(args: &DecideArgs) -> Result<FormState, AppError> {
    let mut lines = args.constraints.clone();
    if let Some(path) = &args.constraints_file {
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::new(
                EXIT_INPUT,
                format!("Failed to read constraints file {}: {e}", path.display()),
            )
        })?;
        lines.push(content);
    }

    Ok(FormState {
        decision_type: args.decision_type.clone(),
        context: args.context.clone(),
        constraints: lines.join("\n"),
        preferences: args
            .preferences
            .clone()
            .unwrap_or_else(|| EMPTY_PREFERENCES.to_string()),
        focus: Field::DecisionType,
    })
}

/// Run one submission and return what should be printed.
///
/// The error side carries the already-rendered error card alongside the
/// error so the caller can print it and still exit non-zero.
pub fn run_decide(
    service: &dyn DecisionService,
    form: FormState,
    format: OutputFormat,
) -> Result<String, (String, DecisionError)> {
    let mut controller = FormController::new(form);
    let outcome = controller.submit_with(service);

    let rendered = match (format, &outcome) {
        (OutputFormat::Json, Ok(response)) => serde_json::to_string_pretty(response)
            .unwrap_or_else(|e| format!("{{\"error\": \"failed to encode response: {e}\"}}")),
        (OutputFormat::Json, Err(err)) => error_json(err),
        _ => render_view(controller.view(), format),
    };

    match outcome {
        Ok(_) => Ok(rendered),
        Err(err) => Err((rendered, err)),
    }
}

/// `{"error": {"kind": .., "message": ..}}`; validation failures also list
/// each violation.
fn error_json(err: &DecisionError) -> String {
    let mut body = json!({
        "kind": err.kind(),
        "message": err.to_string(),
    });
    if let DecisionError::Validation(validation) = err {
        body["violations"] = json!(validation.lines());
    }
    let value = json!({ "error": body });
    // `Value` always serializes.
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

fn render_view(view: &ResultView, format: OutputFormat) -> String {
    match (view, format) {
        (ResultView::Empty, _) => String::new(),
        (ResultView::Result(card), OutputFormat::Html) => html::result_card(card),
        (ResultView::Result(card), _) => text::result_card(card),
        (ResultView::Error(card), OutputFormat::Html) => html::error_card(card),
        (ResultView::Error(card), _) => text::error_card(card),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::ConnArgs;
    use crate::domain::{DecisionRequest, DecisionResponse};
    use crate::error::NetworkError;

    struct Fixed(Result<DecisionResponse, DecisionError>);

    impl DecisionService for Fixed {
        fn submit(&self, _request: &DecisionRequest) -> Result<DecisionResponse, DecisionError> {
            self.0.clone()
        }
    }

    fn args() -> DecideArgs {
        DecideArgs {
            conn: ConnArgs::default(),
            decision_type: "pick_db".to_string(),
            context: "need ACID".to_string(),
            constraints: vec!["low cost".to_string(), " ".to_string()],
            constraints_file: None,
            preferences: None,
            format: OutputFormat::Text,
        }
    }

    fn ok() -> Fixed {
        Fixed(Ok(DecisionResponse {
            recommendation: "<b>Postgres</b>".to_string(),
            reasoning: vec!["ACID support".to_string()],
            confidence_score: 0.9,
            alternative_option: None,
        }))
    }

    #[test]
    fn flags_become_form_fields() {
        let form = form_from_args(&args()).unwrap();
        assert_eq!(form.preferences, EMPTY_PREFERENCES);
        assert_eq!(form.build_request().constraints, vec!["low cost"]);
    }

    #[test]
    fn missing_constraints_file_is_an_input_error() {
        let mut a = args();
        a.constraints_file = Some("/definitely/not/here.txt".into());
        assert_eq!(form_from_args(&a).unwrap_err().exit_code(), EXIT_INPUT);
    }

    #[test]
    fn renders_in_each_format() {
        let form = form_from_args(&args()).unwrap();
        let out = run_decide(&ok(), form.clone(), OutputFormat::Text).unwrap();
        assert!(out.contains("Confidence: 90.0%"));

        let out = run_decide(&ok(), form.clone(), OutputFormat::Html).unwrap();
        assert!(out.contains("&lt;b&gt;Postgres&lt;/b&gt;"));

        let out = run_decide(&ok(), form, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["confidence_score"], 0.9);
    }

    #[test]
    fn failure_returns_rendered_error_card() {
        let form = form_from_args(&args()).unwrap();
        let failing = Fixed(Err(NetworkError::Status {
            code: 500,
            reason: "Internal Server Error".to_string(),
        }
        .into()));
        let (out, err) = run_decide(&failing, form, OutputFormat::Text).unwrap_err();
        assert!(out.contains("500 Internal Server Error"));
        assert!(matches!(err, DecisionError::Network(_)));
    }

    #[test]
    fn json_failure_is_machine_readable() {
        let form = form_from_args(&args()).unwrap();
        let failing = Fixed(Err(NetworkError::Status {
            code: 500,
            reason: "Internal Server Error".to_string(),
        }
        .into()));
        let (out, err) = run_decide(&failing, form, OutputFormat::Json).unwrap_err();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["error"]["kind"], "network");
        assert_eq!(
            value["error"]["message"],
            "API request failed: 500 Internal Server Error"
        );
        assert_eq!(err.exit_code(), crate::error::EXIT_REMOTE);
    }

    #[test]
    fn json_validation_failure_lists_violations() {
        let mut a = args();
        a.context = String::new();
        a.preferences = Some("[1, 2]".to_string());
        let form = form_from_args(&a).unwrap();
        let (out, _) = run_decide(&ok(), form, OutputFormat::Json).unwrap_err();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["error"]["kind"], "validation");
        assert_eq!(
            value["error"]["violations"],
            serde_json::json!(["Context is required", "Preferences must be a JSON object"])
        );
    }

    #[test]
    fn validation_failure_lists_all_problems() {
        let mut a = args();
        a.decision_type = "  ".to_string();
        a.preferences = Some("{bad".to_string());
        let form = form_from_args(&a).unwrap();
        let (out, err) = run_decide(&ok(), form, OutputFormat::Text).unwrap_err();
        assert!(out.contains("Decision type is required"));
        assert!(out.contains("Preferences must be valid JSON"));
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }
}
