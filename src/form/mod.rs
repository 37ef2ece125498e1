//! Raw form fields plus the two pure steps of a submission:
//! validation and request building.

use serde_json::{Map, Value};

use crate::domain::DecisionRequest;
use crate::error::{ValidationError, Violation};

/// Initial content of the preferences field.
pub const EMPTY_PREFERENCES: &str = "{}";

/// The four form inputs, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    DecisionType,
    Context,
    Constraints,
    Preferences,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::DecisionType,
        Field::Context,
        Field::Constraints,
        Field::Preferences,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Field::DecisionType => "Decision type",
            Field::Context => "Context",
            Field::Constraints => "Constraints (one per line)",
            Field::Preferences => "Preferences (JSON)",
        }
    }

    /// Field a violation points at.
    pub fn for_violation(violation: Violation) -> Field {
        match violation {
            Violation::MissingDecisionType => Field::DecisionType,
            Violation::MissingContext => Field::Context,
            Violation::InvalidPreferences | Violation::PreferencesNotObject => Field::Preferences,
        }
    }

    pub fn is_multiline(self) -> bool {
        matches!(self, Field::Constraints | Field::Preferences)
    }

    pub fn next(self) -> Field {
        let idx = Field::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Field::ALL[(idx + 1) % Field::ALL.len()]
    }

    pub fn prev(self) -> Field {
        let idx = Field::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Field::ALL[(idx + Field::ALL.len() - 1) % Field::ALL.len()]
    }
}

/// Raw text of every field plus which one has input focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub decision_type: String,
    pub context: String,
    pub constraints: String,
    pub preferences: String,
    pub focus: Field,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            decision_type: String::new(),
            context: String::new(),
            constraints: String::new(),
            preferences: EMPTY_PREFERENCES.to_string(),
            focus: Field::DecisionType,
        }
    }
}

impl FormState {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::DecisionType => &self.decision_type,
            Field::Context => &self.context,
            Field::Constraints => &self.constraints,
            Field::Preferences => &self.preferences,
        }
    }

    pub fn value_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::DecisionType => &mut self.decision_type,
            Field::Context => &mut self.context,
            Field::Constraints => &mut self.constraints,
            Field::Preferences => &mut self.preferences,
        }
    }

    /// Append a character to the focused field. Newlines are dropped on
    /// single-line fields.
    pub fn insert_char(&mut self, c: char) {
        let focus = self.focus;
        if c == '\n' && !focus.is_multiline() {
            return;
        }
        self.value_mut(focus).push(c);
    }

    pub fn backspace(&mut self) {
        let focus = self.focus;
        self.value_mut(focus).pop();
    }

    /// Check every rule and report all failures at once.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut violations = Vec::new();

        if self.decision_type.trim().is_empty() {
            violations.push(Violation::MissingDecisionType);
        }
        if self.context.trim().is_empty() {
            violations.push(Violation::MissingContext);
        }
        if !self.preferences.trim().is_empty() {
            if let Err(violation) = parse_preferences(&self.preferences) {
                violations.push(violation);
            }
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }

    /// Build the request payload. Assumes [`FormState::validate`] passed;
    /// preferences that fail to parse fall back to an empty object.
    pub fn build_request(&self) -> DecisionRequest {
        let preferences = if self.preferences.trim().is_empty() {
            Map::new()
        } else {
            parse_preferences(&self.preferences).unwrap_or_default()
        };

        DecisionRequest {
            decision_type: self.decision_type.trim().to_string(),
            context: self.context.trim().to_string(),
            constraints: split_constraints(&self.constraints),
            preferences,
        }
    }

    /// Clear every field, restore the empty preferences object and focus the
    /// decision type.
    pub fn reset(&mut self) {
        *self = FormState::default();
    }
}

/// One constraint per line: trimmed, blank lines dropped, order kept.
pub fn split_constraints(text: &str) -> Vec<String> {
    text.split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Preferences must be a JSON object; scalars and arrays are rejected.
fn parse_preferences(text: &str) -> Result<Map<String, Value>, Violation> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(Violation::PreferencesNotObject),
        Err(_) => Err(Violation::InvalidPreferences),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn filled() -> FormState {
        FormState {
            decision_type: "  pick_db ".to_string(),
            context: "need ACID\n".to_string(),
            constraints: "low cost\n\n  managed  \r\n".to_string(),
            preferences: r#"{"cloud": "aws"}"#.to_string(),
            focus: Field::Context,
        }
    }

    #[rstest]
    #[case("", "ctx")]
    #[case("   ", "ctx")]
    #[case("type", "")]
    #[case("type", " \t\n")]
    fn blank_required_fields_fail(#[case] decision_type: &str, #[case] context: &str) {
        let form = FormState {
            decision_type: decision_type.to_string(),
            context: context.to_string(),
            ..FormState::default()
        };
        assert!(form.validate().is_err());
    }

    #[rstest]
    #[case("{", Violation::InvalidPreferences)]
    #[case("not json", Violation::InvalidPreferences)]
    #[case("[1, 2]", Violation::PreferencesNotObject)]
    #[case("42", Violation::PreferencesNotObject)]
    #[case("null", Violation::PreferencesNotObject)]
    fn malformed_preferences_are_named(#[case] prefs: &str, #[case] expected: Violation) {
        let form = FormState {
            preferences: prefs.to_string(),
            ..filled()
        };
        let err = form.validate().unwrap_err();
        assert_eq!(err.violations, vec![expected]);
        assert_eq!(Field::for_violation(expected), Field::Preferences);
        assert!(!err.contains(Violation::MissingContext));
        assert!(err.to_string().contains("Preferences"));
    }

    #[test]
    fn all_violations_are_accumulated() {
        let form = FormState {
            decision_type: " ".to_string(),
            context: String::new(),
            constraints: String::new(),
            preferences: "{oops".to_string(),
            focus: Field::DecisionType,
        };
        let err = form.validate().unwrap_err();
        assert_eq!(
            err.violations,
            vec![
                Violation::MissingDecisionType,
                Violation::MissingContext,
                Violation::InvalidPreferences,
            ]
        );
        assert_eq!(err.to_string().lines().count(), 3);
    }

    #[test]
    fn blank_preferences_are_allowed() {
        let form = FormState {
            preferences: "   ".to_string(),
            ..filled()
        };
        assert!(form.validate().is_ok());
        assert!(form.build_request().preferences.is_empty());
    }

    #[test]
    fn constraints_are_trimmed_and_blank_lines_dropped() {
        assert_eq!(split_constraints("a\n\n b \n"), vec!["a", "b"]);
        assert!(split_constraints("").is_empty());
        assert!(split_constraints("\n \n").is_empty());
    }

    #[test]
    fn build_request_trims_and_parses() {
        let req = filled().build_request();
        assert_eq!(req.decision_type, "pick_db");
        assert_eq!(req.context, "need ACID");
        assert_eq!(req.constraints, vec!["low cost", "managed"]);
        assert_eq!(req.preferences.get("cloud"), Some(&Value::from("aws")));
    }

    #[test]
    fn build_request_is_idempotent() {
        let form = filled();
        assert_eq!(form.build_request(), form.build_request());
    }

    #[test]
    fn reset_restores_defaults() {
        let mut form = filled();
        form.reset();
        assert_eq!(form, FormState::default());
        assert_eq!(form.preferences, EMPTY_PREFERENCES);
        assert_eq!(form.focus, Field::DecisionType);
    }

    #[test]
    fn newline_only_lands_in_multiline_fields() {
        let mut form = FormState::default();
        form.insert_char('a');
        form.insert_char('\n');
        assert_eq!(form.decision_type, "a");

        form.focus = Field::Constraints;
        form.insert_char('x');
        form.insert_char('\n');
        form.insert_char('y');
        assert_eq!(form.constraints, "x\ny");
        form.backspace();
        assert_eq!(form.constraints, "x\n");
    }

    #[test]
    fn focus_cycles_through_all_fields() {
        let mut f = Field::DecisionType;
        for _ in 0..Field::ALL.len() {
            f = f.next();
        }
        assert_eq!(f, Field::DecisionType);
        assert_eq!(Field::DecisionType.prev(), Field::Preferences);
    }
}
