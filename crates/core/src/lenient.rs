//! Tolerant serde helpers for backend payloads.
//!
//! The backend stores whatever the plan generator produced, so numeric fields
//! sometimes arrive as strings (`"day": "2"`) and text fields as `null`.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts `2`, `2.0` or `"2"`; anything else becomes `None`.
#[must_use]
pub fn value_as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Renders a scalar as display text; `null` and containers become `None`.
#[must_use]
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn u32_or_default<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_u32(&value).unwrap_or_default())
}

pub fn day_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_u32(&value).filter(|day| *day > 0).unwrap_or(1))
}

pub fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_text(&value).unwrap_or_default())
}

pub fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_text(&value).filter(|text| !text.trim().is_empty()))
}

pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.iter().filter_map(value_as_text).collect(),
        Value::String(single) if !single.trim().is_empty() => vec![single],
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_accept_strings_and_floats() {
        assert_eq!(value_as_u32(&json!(3)), Some(3));
        assert_eq!(value_as_u32(&json!("7")), Some(7));
        assert_eq!(value_as_u32(&json!(2.0)), Some(2));
        assert_eq!(value_as_u32(&json!("N/A")), None);
        assert_eq!(value_as_u32(&json!(-1)), None);
    }

    #[test]
    fn text_rejects_containers() {
        assert_eq!(value_as_text(&json!("x")), Some("x".to_string()));
        assert_eq!(value_as_text(&json!(4)), Some("4".to_string()));
        assert_eq!(value_as_text(&json!(null)), None);
        assert_eq!(value_as_text(&json!([1])), None);
    }
}
