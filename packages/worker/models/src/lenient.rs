//! Tolerant `serde` adapters for columns whose JSON type varies by row.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Accepts a string, number or null and yields optional text.
///
/// Numbers become their decimal representation (a postcode stored as
/// `2607` reads as `"2607"`). Booleans, arrays and objects read as `None`.
///
/// # Errors
///
/// Only propagates errors from the underlying deserializer.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(&Option::<Value>::deserialize(deserializer)?.unwrap_or(Value::Null)))
}

/// Like [`text`] but yields an empty string for null or non-text values.
///
/// # Errors
///
/// Only propagates errors from the underlying deserializer.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(text(deserializer)?.unwrap_or_default())
}

/// Accepts a boolean, `"true"`/`"false"`, or null. Null and anything else
/// read as `false`.
///
/// # Errors
///
/// Only propagates errors from the underlying deserializer.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// Textual form of a scalar JSON value, if it has one.
#[must_use]
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accepts RFC 3339 timestamps, offset-less timestamps (read as UTC), or
/// null. Unparsable text reads as `None`.
///
/// # Errors
///
/// Only propagates errors from the underlying deserializer.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?
        .as_deref()
        .and_then(parse_timestamp))
}

/// Parses a store timestamp.
#[must_use]
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Accepts a number, a numeric string, or null and yields `0.0` for
/// anything unusable.
///
/// # Errors
///
/// Only propagates errors from the underlying deserializer.
pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    })
}
