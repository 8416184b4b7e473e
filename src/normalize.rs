//! Numeric input normalization
//!
//! Every numeric parameter passes through [`normalize_number`] before it
//! reaches a cost formula, so empty fields, currency-formatted strings or
//! garbage never turn into NaN or infinity downstream.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Characters stripped from string input before parsing
const CURRENCY_SYMBOLS: [char; 6] = ['$', '€', '£', '¥', '₹', '₩'];

/// Coerce an arbitrary value into a finite number.
///
/// - finite numbers are returned unchanged
/// - strings have currency symbols, commas and whitespace removed, then are
///   parsed as a float
/// - anything else (or anything that does not parse to a finite value)
///   yields `fallback`
pub fn normalize_number(value: &Value, fallback: f64) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).unwrap_or(fallback),
        Value::String(s) => normalize_str(s, fallback),
        _ => fallback,
    }
}

/// String flavour of [`normalize_number`]
pub fn normalize_str(raw: &str, fallback: f64) -> f64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace() && !CURRENCY_SYMBOLS.contains(c))
        .collect();

    // `f64::from_str` accepts "inf" and "NaN", so finiteness is checked explicitly
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => fallback,
    }
}

/// Serde adapter for numeric parameter fields.
///
/// Accepts numbers, currency strings and anything else; the result is always
/// finite (falling back to 0).
pub fn lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(normalize_number(&value, 0.0))
}

/// Optional variant of [`lenient`]: a missing, null or unparseable value is `None`
pub fn lenient_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        let parsed = normalize_number(&v, f64::NAN);
        parsed.is_finite().then_some(parsed)
    }))
}
