//! Defensive field readers for reference data.
//!
//! Reference files are hand-edited. A number may arrive as a string, as null, or
//! not at all; none of that may abort a catalog load or a derivation pass.
//! Malformed numbers read as 0 (multipliers as 1).

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Finite numeric value of a JSON scalar. Numeric strings are accepted.
pub fn number_from_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

pub fn int_from_value(value: &Value) -> i32 {
    number_from_value(value)
        .map(|n| n.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32)
        .unwrap_or(0)
}

pub fn int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(int_from_value(&value))
}

pub fn opt_int<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).map(|_| int_from_value(&value)))
}

pub fn float<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value).unwrap_or(0.0))
}

pub fn default_multiplier() -> f64 {
    1.0
}

/// Multipliers must be positive; anything else reads as 1.
pub fn multiplier<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(sanitize_multiplier(number_from_value(&value)))
}

pub fn sanitize_multiplier(raw: Option<f64>) -> f64 {
    match raw {
        Some(m) if m > 0.0 => m,
        _ => 1.0,
    }
}

/// A list of strings. A bare string becomes a one-element list; non-string
/// entries are dropped.
pub fn strings<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(strings_from_value(&value))
}

pub fn strings_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    }
}

pub fn opt_strings<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        other => Some(strings_from_value(&other)),
    })
}

/// Free text that is sometimes written as a number (`"range": 120`).
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(&value))
}

pub fn text_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn malformed_numbers_read_as_zero() {
        assert_eq!(int_from_value(&json!("abc")), 0);
        assert_eq!(int_from_value(&json!(null)), 0);
        assert_eq!(int_from_value(&json!({"x": 1})), 0);
        assert_eq!(int_from_value(&json!(" 14 ")), 14);
        assert_eq!(int_from_value(&json!(2.6)), 3);
    }

    #[test]
    fn multiplier_rejects_non_positive() {
        assert_eq!(sanitize_multiplier(Some(0.0)), 1.0);
        assert_eq!(sanitize_multiplier(Some(-2.0)), 1.0);
        assert_eq!(sanitize_multiplier(None), 1.0);
        assert_eq!(sanitize_multiplier(Some(1.5)), 1.5);
    }

    #[test]
    fn string_lists_tolerate_scalars_and_junk() {
        assert_eq!(strings_from_value(&json!("wyvern")), vec!["wyvern"]);
        assert_eq!(strings_from_value(&json!(["a", 3, "b"])), vec!["a", "b"]);
        assert!(strings_from_value(&json!(7)).is_empty());
    }
}
