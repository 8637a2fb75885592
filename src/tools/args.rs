//! Argument extraction for tool handlers
//!
//! Discovery publishes every argument as a string, so callers routinely send
//! ids as `"123"` and structured values as JSON text. Handlers accept both.

use serde_json::{Map, Value};

use crate::{Error, Result};

/// Owned `tools/call` arguments object with typed accessors
#[derive(Debug)]
pub struct Arguments {
    map: Map<String, Value>,
}

impl Arguments {
    /// Wrap raw arguments; anything but an object is treated as empty
    #[must_use]
    pub fn new(value: Value) -> Self {
        let map = match value {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self { map }
    }

    fn present(&self, name: &str) -> Option<&Value> {
        match self.map.get(name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(v) => Some(v),
        }
    }

    fn missing(name: &str) -> Error {
        Error::InvalidArguments(format!("'{name}' is required"))
    }

    /// Required string
    pub fn string(&self, name: &str) -> Result<String> {
        self.opt_string(name)?.ok_or_else(|| Self::missing(name))
    }

    /// Optional string (numbers and booleans are stringified)
    pub fn opt_string(&self, name: &str) -> Result<Option<String>> {
        match self.present(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(Some(v.to_string())),
            Some(_) => Err(Error::InvalidArguments(format!(
                "'{name}' must be a string"
            ))),
        }
    }

    /// Required object id
    pub fn id(&self, name: &str) -> Result<u64> {
        self.opt_id(name)?.ok_or_else(|| Self::missing(name))
    }

    /// Optional object id (number or numeric string)
    pub fn opt_id(&self, name: &str) -> Result<Option<u64>> {
        let invalid = || Error::InvalidArguments(format!("'{name}' must be a numeric id"));
        match self.present(name) {
            None => Ok(None),
            Some(Value::Number(n)) => n.as_u64().map(Some).ok_or_else(invalid),
            Some(Value::String(s)) => s.trim().parse().map(Some).map_err(|_| invalid()),
            Some(_) => Err(invalid()),
        }
    }

    /// Optional list of ids: JSON array, JSON text, or comma-separated text
    pub fn opt_ids(&self, name: &str) -> Result<Option<Vec<u64>>> {
        let invalid = || Error::InvalidArguments(format!("'{name}' must be a list of ids"));
        let Some(value) = self.present(name) else {
            return Ok(None);
        };

        let items: Vec<Value> = match value {
            Value::Array(items) => items.clone(),
            Value::Number(_) => vec![value.clone()],
            Value::String(s) => match serde_json::from_str::<Value>(s) {
                Ok(Value::Array(items)) => items,
                _ => s
                    .split(',')
                    .map(|part| Value::String(part.trim().to_string()))
                    .collect(),
            },
            _ => return Err(invalid()),
        };

        items
            .iter()
            .map(|item| match item {
                Value::Number(n) => n.as_u64().ok_or_else(invalid),
                Value::String(s) => s.trim().parse().map_err(|_| invalid()),
                _ => Err(invalid()),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    /// Required list of ids
    pub fn ids(&self, name: &str) -> Result<Vec<u64>> {
        self.opt_ids(name)?.ok_or_else(|| Self::missing(name))
    }

    /// Optional number within inclusive bounds
    pub fn opt_number(&self, name: &str, min: f64, max: f64) -> Result<Option<f64>> {
        let invalid = || {
            Error::InvalidArguments(format!("'{name}' must be a number between {min} and {max}"))
        };
        let number = match self.present(name) {
            None => return Ok(None),
            Some(Value::Number(n)) => n.as_f64().ok_or_else(invalid)?,
            Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid())?,
            Some(_) => return Err(invalid()),
        };
        if (min..=max).contains(&number) {
            Ok(Some(number))
        } else {
            Err(invalid())
        }
    }

    /// Optional boolean (`true`/`false` or their string forms)
    pub fn opt_bool(&self, name: &str) -> Result<Option<bool>> {
        match self.present(name) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(Error::InvalidArguments(format!("'{name}' must be a boolean"))),
            },
            Some(_) => Err(Error::InvalidArguments(format!("'{name}' must be a boolean"))),
        }
    }

    /// Optional string restricted to `allowed`
    pub fn opt_choice(&self, name: &str, allowed: &[&str]) -> Result<Option<String>> {
        match self.opt_string(name)? {
            Some(v) if !allowed.contains(&v.as_str()) => Err(Error::InvalidArguments(format!(
                "'{name}' must be one of: {}",
                allowed.join(", ")
            ))),
            other => Ok(other),
        }
    }

    /// Required JSON value (accepts the value itself or JSON text)
    pub fn json(&self, name: &str) -> Result<Value> {
        self.opt_json(name)?.ok_or_else(|| Self::missing(name))
    }

    /// Optional JSON value (accepts the value itself or JSON text)
    pub fn opt_json(&self, name: &str) -> Result<Option<Value>> {
        match self.present(name) {
            None => Ok(None),
            Some(Value::String(s)) => serde_json::from_str(s).map(Some).map_err(|e| {
                Error::InvalidArguments(format!("'{name}' is not valid JSON: {e}"))
            }),
            Some(v) => Ok(Some(v.clone())),
        }
    }
}
