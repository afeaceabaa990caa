//! Literal rendering for statement values. Statements are plain text, so every value is
//! inlined as a quoted literal.

use serde_json::Value;

/// `it's` -> `'it''s'`
pub fn quote_text(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

/// Numeric and boolean template arguments render unquoted.
pub fn render_number<N: std::fmt::Display>(n: N) -> String {
    n.to_string()
}

/// Column value as stored: always quoted, null/absent as the empty string.
pub fn stored_literal(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => "''".to_string(),
        Some(Value::String(s)) => quote_text(s),
        Some(Value::Bool(b)) => quote_text(&b.to_string()),
        Some(Value::Number(n)) => quote_text(&n.to_string()),
        Some(other) => quote_text(&other.to_string()),
    }
}
