//! Quantity parsing
//!
//! Integers, decimals, simple fractions, mixed numbers and ranges.
//! Never fails and never yields NaN or infinity.

use std::sync::LazyLock;

use regex::Regex;

/// Largest quantity accepted; larger values are clamped
pub const MAX_QUANTITY: f64 = 1_000_000.0;

/// Quantity used when nothing parseable is found
pub const DEFAULT_QUANTITY: f64 = 1.0;

/// A single numeric token at the start of a line: 2, 1.5, .5, 1/2, 2-3, 200g
static NUMERIC_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\d+(?:\.\d+)?|\.\d+)(?:/\d+)?(?:\s*[-–]\s*(?:\d+(?:\.\d+)?|\.\d+)(?:/\d+)?)?").unwrap()
});

fn parse_number(token: &str) -> f64 {
    match token.split_once('/') {
        Some((num, den)) => {
            let num = num.trim().parse::<f64>();
            let den = den.trim().parse::<f64>();
            match (num, den) {
                (Ok(n), Ok(d)) if d > 0.0 && n.is_finite() && d.is_finite() => n / d,
                _ => 1.0,
            }
        }
        None => token.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(1.0),
    }
}

fn parse_token(token: &str) -> f64 {
    // Ranges ("2-3") take the midpoint; a leading '-' is not a range
    if let Some(idx) = token.char_indices().skip(1).find(|(_, c)| *c == '-' || *c == '–').map(|(i, _)| i) {
        let (low, high) = token.split_at(idx);
        let high = high.trim_start_matches(['-', '–']);
        return (parse_number(low) + parse_number(high)) / 2.0;
    }
    parse_number(token)
}

/// Clamp to `(0, MAX_QUANTITY]`, defaulting non-positive or non-finite values
pub fn clamp_quantity(value: f64) -> f64 {
    if !value.is_finite() || value <= 0.0 {
        DEFAULT_QUANTITY
    } else {
        value.min(MAX_QUANTITY)
    }
}

/// Parse a quantity string.
///
/// Whitespace-separated tokens are summed, so `"1 1/2"` is 1.5. A token with an
/// invalid, zero or negative denominator, or that is not numeric at all, counts
/// as 1.
pub fn parse_quantity(text: &str) -> f64 {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.is_empty() {
        return DEFAULT_QUANTITY;
    }
    clamp_quantity(tokens.iter().map(|t| parse_token(t)).sum())
}

/// Split a leading quantity off a line.
///
/// Returns the quantity text (e.g. `"1 1/2"`, `"200"`) and the rest. Accepts at
/// most a whole number followed by a fraction, and splits glued units (`200g`).
pub fn split_leading_quantity(line: &str) -> (Option<String>, &str) {
    let line = line.trim_start();
    let Some(first) = NUMERIC_TOKEN.find(line) else {
        return (None, line);
    };

    let mut end = first.end();
    let first_text = first.as_str();

    // Mixed number: whole number followed by a fraction ("1 1/2")
    if !first_text.contains('/') && !first_text.contains('.') {
        let rest = &line[end..];
        let trimmed = rest.trim_start();
        if rest.len() != trimmed.len() {
            if let Some(second) = NUMERIC_TOKEN.find(trimmed) {
                let second_end = second.end();
                let boundary_ok = trimmed[second_end..]
                    .chars()
                    .next()
                    .map_or(true, |c| !c.is_ascii_digit());
                if second.as_str().contains('/') && boundary_ok {
                    end += (rest.len() - trimmed.len()) + second_end;
                }
            }
        }
    }

    let quantity = line[..end].split_whitespace().collect::<Vec<_>>().join(" ");
    (Some(quantity), line[end..].trim_start())
}

/// True when the text starts with an explicit numeric quantity
pub fn has_leading_quantity(text: &str) -> bool {
    NUMERIC_TOKEN.is_match(text.trim_start())
}
