//! Open options bag handed to readers and writers untouched.
//!
//! Keys are owned by each reader/writer; this type only offers typed getters
//! that fail with `Error::InvalidOption` when a key holds the wrong JSON type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormatOptions(Map<String, Value>);

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Options from a JSON object, e.g. parsed from a CLI flag.
    pub fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(Error::InvalidOption {
                key: "<root>".into(),
                message: format!("expected a JSON object, got {}", other),
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(invalid(key, "a boolean", other)),
        }
    }

    pub fn get_str(&self, key: &str) -> Result<Option<&str>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(other) => Err(invalid(key, "a string", other)),
        }
    }

    pub fn get_usize(&self, key: &str) -> Result<Option<usize>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(v) => v
                .as_u64()
                .map(|n| Some(n as usize))
                .ok_or_else(|| invalid(key, "a non-negative integer", v)),
        }
    }

    /// Like `get_usize`, but `0` is rejected.
    pub fn get_positive_usize(&self, key: &str) -> Result<Option<usize>> {
        match self.get_usize(key)? {
            Some(0) => Err(Error::InvalidOption {
                key: key.to_string(),
                message: "must be greater than 0".into(),
            }),
            n => Ok(n),
        }
    }

    /// Single-byte character option such as a csv delimiter.
    pub fn get_byte(&self, key: &str) -> Result<Option<u8>> {
        match self.get_str(key)? {
            None => Ok(None),
            Some(s) if s.len() == 1 => Ok(Some(s.as_bytes()[0])),
            Some(s) => Err(Error::InvalidOption {
                key: key.to_string(),
                message: format!("expected a single ASCII character, got '{}'", s),
            }),
        }
    }

    pub fn get_str_list(&self, key: &str) -> Result<Option<Vec<String>>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| {
                    v.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| invalid(key, "a list of strings", v))
                })
                .collect::<Result<Vec<_>>>()
                .map(Some),
            Some(other) => Err(invalid(key, "a list of strings", other)),
        }
    }
}

impl From<Map<String, Value>> for FormatOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn invalid(key: &str, expected: &str, got: &Value) -> Error {
    Error::InvalidOption {
        key: key.to_string(),
        message: format!("expected {}, got {}", expected, got),
    }
}
