//! Plain-text rendering for terminal output outside the TUI.

use super::escape;
use super::{ERROR_HINT, ERROR_TITLE, ErrorCard, RESULT_TITLE, ResultCard};

/// Width of the confidence bar in characters.
pub const BAR_CELLS: usize = 20;

/// `[##########----------]` for 50%.
pub fn confidence_bar(card: &ResultCard, cells: usize) -> String {
    let filled = ((card.bar_width / 100.0) * cells as f64).round() as usize;
    let filled = filled.min(cells);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(cells - filled))
}

pub fn result_card(card: &ResultCard) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {RESULT_TITLE} ===\n"));
    out.push_str(&format!(
        "Recommendation: {}\n",
        escape::terminal(&card.recommendation, false)
    ));

    out.push_str("\nReasoning:\n");
    for (idx, reason) in card.reasoning.iter().enumerate() {
        out.push_str(&format!("{:>3}. {}\n", idx + 1, escape::terminal(reason, false)));
    }

    out.push_str(&format!(
        "\nConfidence: {} {}\n",
        card.confidence_label,
        confidence_bar(card, BAR_CELLS)
    ));

    if let Some(alt) = &card.alternative {
        out.push_str(&format!("Alternative: {}\n", escape::terminal(alt, false)));
    }

    out
}

pub fn error_card(card: &ErrorCard) -> String {
    format!(
        "=== {ERROR_TITLE} ===\n{}\n\n{ERROR_HINT}\n",
        escape::terminal(&card.message, true)
    )
}
