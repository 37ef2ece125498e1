//! Escaping for untrusted text (user input and service output).

/// Escape text for insertion into HTML element content or attribute values.
pub fn html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Make text safe to print to a terminal.
///
/// Control characters (ESC included) are replaced by their visible escape
/// form so a response cannot move the cursor, recolor the screen or smuggle
/// hyperlinks. Newlines and tabs are kept when `keep_newlines` is set.
pub fn terminal(text: &str, keep_newlines: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' | '\t' if keep_newlines => out.push(c),
            c if c.is_control() => out.extend(c.escape_default()),
            _ => out.push(c),
        }
    }
    out
}
