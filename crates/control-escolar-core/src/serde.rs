//! Serde helpers shared by the request DTOs and the persistence layer.
//!
//! Teachers' subjects and courses' schedule-days are stored as serialized
//! JSON inside text columns. Writing always goes through
//! [`encode_json_text`]; reading never fails: malformed text decodes to an
//! empty list ([`decode_json_list`]) or an empty object
//! ([`decode_json_value`]).

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// Serializes a value into the text stored in an embedded JSON column.
pub fn encode_json_text<T>(value: &T) -> Result<String, AppError>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value)
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to encode JSON field: {}", e)))
}

/// Decodes an embedded JSON list. Anything that is not a JSON array yields `[]`.
pub fn decode_json_list(text: &str) -> Vec<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => items,
        Ok(_) | Err(_) => Vec::new(),
    }
}

/// Decodes an embedded JSON value of any shape, falling back to `{}`.
pub fn decode_json_value(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|_| Value::Object(Map::new()))
}

/// Deserializes an optional numeric identifier.
///
/// Accepts a number, a numeric string, an empty string or `null`. Blank
/// values and `0` mean "no reference".
pub fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    let id = match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => Some(
            n.as_i64()
                .ok_or_else(|| serde::de::Error::custom("expected an integer id"))?,
        ),
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(
            s.trim()
                .parse::<i64>()
                .map_err(|_| serde::de::Error::custom(format!("invalid id: {}", s)))?,
        ),
        Some(other) => {
            return Err(serde::de::Error::custom(format!(
                "invalid id type: {}",
                other
            )));
        }
    };

    Ok(id.filter(|id| *id != 0))
}

/// Deserializes a field that clients send either as a string or as a number.
/// `null` becomes an empty string.
pub fn deserialize_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected a string or a number, got {}",
            other
        ))),
    }
}
