//! HTML fragments for the result region.

use super::escape;
use super::{ERROR_HINT, ERROR_TITLE, ErrorCard, RESULT_TITLE, ResultCard};

pub fn result_card(card: &ResultCard) -> String {
    let mut out = String::new();

    out.push_str("<div class=\"result-card\">\n");
    out.push_str(&format!("  <h3>{RESULT_TITLE}</h3>\n"));

    out.push_str("  <div class=\"result-section\">\n");
    out.push_str("    <h4>Recommendation</h4>\n");
    out.push_str(&format!(
        "    <p class=\"recommendation\">{}</p>\n",
        escape::html(&card.recommendation)
    ));
    out.push_str("  </div>\n");

    out.push_str("  <div class=\"result-section\">\n");
    out.push_str("    <h4>Reasoning</h4>\n");
    out.push_str("    <ol class=\"reasoning-list\">\n");
    for reason in &card.reasoning {
        out.push_str(&format!("      <li>{}</li>\n", escape::html(reason)));
    }
    out.push_str("    </ol>\n");
    out.push_str("  </div>\n");

    out.push_str("  <div class=\"result-section metrics\">\n");
    out.push_str("    <span class=\"metric-label\">Confidence Score:</span>\n");
    out.push_str(&format!(
        "    <span class=\"metric-value\">{}</span>\n",
        card.confidence_label
    ));
    out.push_str(&format!(
        "    <div class=\"confidence-bar\"><div class=\"confidence-fill\" style=\"width: {}\"></div></div>\n",
        card.bar_css_width()
    ));
    out.push_str("  </div>\n");

    if let Some(alt) = &card.alternative {
        out.push_str("  <div class=\"result-section\">\n");
        out.push_str("    <h4>Alternative Option</h4>\n");
        out.push_str(&format!(
            "    <p class=\"alternative\">{}</p>\n",
            escape::html(alt)
        ));
        out.push_str("  </div>\n");
    }

    out.push_str("</div>\n");
    out
}

pub fn error_card(card: &ErrorCard) -> String {
    let mut out = String::new();
    out.push_str("<div class=\"error-card\">\n");
    out.push_str(&format!("  <h3>{ERROR_TITLE}</h3>\n"));
    out.push_str(&format!(
        "  <p class=\"error-message\">{}</p>\n",
        escape::html(&card.message)
    ));
    out.push_str(&format!("  <p class=\"error-hint\">{ERROR_HINT}</p>\n"));
    out.push_str("</div>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DecisionResponse;

    fn card(recommendation: &str, alternative: Option<&str>) -> ResultCard {
        ResultCard::from_response(&DecisionResponse {
            recommendation: recommendation.to_string(),
            reasoning: vec!["ACID support".to_string(), "<b>mature</b>".to_string()],
            confidence_score: 0.9,
            alternative_option: alternative.map(str::to_string),
        })
    }

    #[test]
    fn script_in_recommendation_is_inert() {
        let out = result_card(&card("<script>alert(1)</script>", None));
        assert!(!out.contains("<script>"));
        assert!(out.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(out.contains("<li>&lt;b&gt;mature&lt;/b&gt;</li>"));
    }

    #[test]
    fn renders_metrics_and_optional_alternative() {
        let out = result_card(&card("Postgres", None));
        assert!(out.contains("90.0%"));
        assert!(out.contains("width: 90%"));
        assert_eq!(out.matches("<li>").count(), 2);
        assert!(!out.contains("Alternative Option"));

        let out = result_card(&card("Postgres", Some("SQLite")));
        assert!(out.contains("<p class=\"alternative\">SQLite</p>"));
    }

    #[test]
    fn error_message_is_escaped() {
        let out = error_card(&ErrorCard {
            message: "bad <input>".to_string(),
        });
        assert!(out.contains("bad &lt;input&gt;"));
    }
}
