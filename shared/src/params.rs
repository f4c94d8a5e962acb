//! Opaque command parameters
//!
//! Parameters are an arbitrary JSON-shaped tree. They are carried through the
//! system untouched; only the scheduling path ever parses them from text.
//! Object keys keep the order they were written in and integers stay
//! integers, so a payload serializes back to the document it came from.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Errors that can occur while turning user text into parameters
#[derive(Error, Debug)]
pub enum ParamsError {
    #[error("Params must be valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// A JSON-like parameter value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(into = "Value")]
pub enum ParamValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<ParamValue>),
    /// Entries in insertion order
    Map(Vec<(String, ParamValue)>),
}

impl Default for ParamValue {
    fn default() -> Self {
        Self::empty()
    }
}

impl ParamValue {
    /// An empty map, the value used when no params are given
    pub fn empty() -> Self {
        Self::Map(Vec::new())
    }

    /// Build a map from key/value pairs. A repeated key replaces the
    /// earlier value in place.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ParamValue)>,
    {
        let mut map: Vec<(String, ParamValue)> = Vec::new();
        for (key, value) in entries {
            let key = key.into();
            match map.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => map.push((key, value)),
            }
        }
        Self::Map(map)
    }

    /// Parse free text typed by a user.
    ///
    /// Blank text means "no params" and yields an empty map. Anything else
    /// must be a JSON document.
    pub fn from_text(raw: &str) -> Result<Self, ParamsError> {
        if raw.trim().is_empty() {
            return Ok(Self::empty());
        }
        let value: Value = serde_json::from_str(raw)?;
        Ok(value.into())
    }
}

impl From<Value> for ParamValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Into::into).collect()),
            Value::Object(entries) => {
                Self::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<ParamValue> for Value {
    fn from(value: ParamValue) -> Self {
        match value {
            ParamValue::Null => Value::Null,
            ParamValue::Bool(b) => Value::Bool(b),
            ParamValue::Number(n) => Value::Number(n),
            ParamValue::String(s) => Value::String(s),
            ParamValue::List(items) => Value::Array(items.into_iter().map(Into::into).collect()),
            ParamValue::Map(entries) => Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.into()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}
