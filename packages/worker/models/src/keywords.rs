//! Normalization of detected-keyword payloads.
//!
//! The store hands back `keywords_detected` as a JSON array, as a string
//! holding an encoded JSON array, or as a key/value object depending on
//! how the row was written. [`KeywordPayload`] captures those shapes at
//! the ingestion edge and [`KeywordPayload::into_keywords`] collapses them
//! into the one canonical form: a list of strings.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// The shapes a keyword payload may arrive in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum KeywordPayload {
    /// A JSON array.
    List(Vec<Value>),
    /// A string that may contain a JSON-encoded array.
    Encoded(String),
    /// A key/value object whose values are the keywords.
    Map(serde_json::Map<String, Value>),
    /// Anything else (numbers, booleans, null).
    Other(Value),
}

impl From<Value> for KeywordPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self::List(items),
            Value::String(s) => Self::Encoded(s),
            Value::Object(map) => Self::Map(map),
            other => Self::Other(other),
        }
    }
}

impl KeywordPayload {
    /// Collapses the payload into a list of keyword strings.
    ///
    /// Non-string elements are dropped. Strings that do not decode to a
    /// JSON array, and every other shape, yield an empty list.
    #[must_use]
    pub fn into_keywords(self) -> Vec<String> {
        match self {
            Self::List(items) => strings_only(items),
            Self::Encoded(s) => match serde_json::from_str::<Value>(&s) {
                Ok(Value::Array(items)) => strings_only(items),
                _ => Vec::new(),
            },
            Self::Map(map) => strings_only(map.into_iter().map(|(_, v)| v)),
            Self::Other(_) => Vec::new(),
        }
    }
}

fn strings_only(values: impl IntoIterator<Item = Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect()
}

/// Normalizes any keyword payload value into a list of strings.
#[must_use]
pub fn normalize_keywords(value: Option<Value>) -> Vec<String> {
    value.map_or_else(Vec::new, |v| KeywordPayload::from(v).into_keywords())
}

/// `serde` adapter that accepts any keyword payload shape and yields the
/// normalized list.
///
/// # Errors
///
/// Never fails on well-formed JSON; only propagates errors from the
/// underlying deserializer.
pub fn deserialize_keywords<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let payload = Option::<KeywordPayload>::deserialize(deserializer)?;
    Ok(payload.map_or_else(Vec::new, KeywordPayload::into_keywords))
}
