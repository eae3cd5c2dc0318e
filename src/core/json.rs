// src/core/json.rs
// Small accessors over `serde_json::Value` for payloads whose shape we do not own.
// Missing required keys become `MalformedResponse` with the key path in the message.

use serde_json::Value;

use crate::error::{FoodError, Result};

pub fn field<'a>(v: &'a Value, key: &str, ctx: &str) -> Result<&'a Value> {
    v.get(key)
        .filter(|x| !x.is_null())
        .ok_or_else(|| FoodError::malformed(format!("{ctx}: missing `{key}`")))
}

pub fn array<'a>(v: &'a Value, key: &str, ctx: &str) -> Result<&'a Vec<Value>> {
    field(v, key, ctx)?
        .as_array()
        .ok_or_else(|| FoodError::malformed(format!("{ctx}: `{key}` is not an array")))
}

/// Remote ids come as numbers or numeric strings depending on the endpoint.
pub fn as_id(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub fn id_field(v: &Value, key: &str, ctx: &str) -> Result<i64> {
    let raw = field(v, key, ctx)?;
    as_id(raw).ok_or_else(|| FoodError::malformed(format!("{ctx}: `{key}` is not an id: {raw}")))
}

pub fn str_field(v: &Value, key: &str, ctx: &str) -> Result<String> {
    let raw = field(v, key, ctx)?;
    raw.as_str()
        .map(str::to_string)
        .ok_or_else(|| FoodError::malformed(format!("{ctx}: `{key}` is not a string")))
}

/// Scalar rendered as the text the page would show; null and containers become "".
pub fn text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => s!(),
    }
}

pub fn opt_text(v: &Value, key: &str) -> Option<String> {
    v.get(key).map(text).filter(|s| !s.is_empty())
}

pub fn opt_f64(v: &Value, key: &str) -> Option<f64> {
    match v.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.replace(',', "").trim().parse().ok(),
        _ => None,
    }
}
