//! Text-to-number coercion for hand-built financial sheets

/// Parse a numeric cell that was stored as text.
///
/// Accepts the formatting people type into models: thousands separators,
/// currency symbols, a trailing percent sign and accounting-style negatives.
/// A percent sign is dropped without rescaling, so `"9%"` parses as `9.0`.
///
/// Returns `None` for empty text, non-numeric text and non-finite results.
pub fn parse_numeric_text(text: &str) -> Option<f64> {
    let mut text = text.trim();
    if text.is_empty() {
        return None;
    }

    // (1,234) is -1234 in accounting notation
    let mut negative = false;
    if let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        negative = true;
        text = inner.trim();
    }

    let text = text.strip_suffix('%').unwrap_or(text).trim_end();

    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '€' | '£' | ' ' | '\u{a0}'))
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let value: f64 = cleaned.parse().ok()?;
    if !value.is_finite() {
        return None;
    }

    Some(if negative { -value } else { value })
}
