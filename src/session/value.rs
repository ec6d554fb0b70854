//! Typed values held in a session map

use crate::error::{SatchelError, SatchelResult};
use crate::session::map::SessionMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A value stored under a session key
///
/// Serialized with an explicit type tag so that timestamps and integers
/// survive a round-trip through a transport unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SessionValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    List(Vec<SessionValue>),
    Map(SessionMap),
}

impl SessionValue {
    /// Whether the value counts as empty.
    ///
    /// `""`, `"0"`, `0`, `0.0`, `false` and empty collections are empty.
    /// A timestamp never is.
    pub fn is_empty(&self) -> bool {
        match self {
            SessionValue::Text(s) => s.is_empty() || s == "0",
            SessionValue::Int(n) => *n == 0,
            SessionValue::Float(f) => *f == 0.0,
            SessionValue::Bool(b) => !b,
            SessionValue::Timestamp(_) => false,
            SessionValue::List(items) => items.is_empty(),
            SessionValue::Map(map) => map.is_empty(),
        }
    }

    /// Short name of the variant, for messages and listings
    pub fn type_name(&self) -> &'static str {
        match self {
            SessionValue::Text(_) => "text",
            SessionValue::Int(_) => "int",
            SessionValue::Float(_) => "float",
            SessionValue::Bool(_) => "bool",
            SessionValue::Timestamp(_) => "timestamp",
            SessionValue::List(_) => "list",
            SessionValue::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            SessionValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            SessionValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            SessionValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&SessionMap> {
        match self {
            SessionValue::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_map_mut(&mut self) -> Option<&mut SessionMap> {
        match self {
            SessionValue::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Plain JSON view without type tags
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            SessionValue::Text(s) => serde_json::Value::String(s.clone()),
            SessionValue::Int(n) => serde_json::Value::from(*n),
            SessionValue::Float(f) => serde_json::Value::from(*f),
            SessionValue::Bool(b) => serde_json::Value::Bool(*b),
            SessionValue::Timestamp(t) => serde_json::Value::String(t.to_rfc3339()),
            SessionValue::List(items) => {
                serde_json::Value::Array(items.iter().map(SessionValue::to_json).collect())
            }
            SessionValue::Map(map) => map.to_json(),
        }
    }
}

impl TryFrom<serde_json::Value> for SessionValue {
    type Error = SatchelError;

    fn try_from(value: serde_json::Value) -> SatchelResult<Self> {
        Ok(match value {
            serde_json::Value::Null => {
                return Err(SatchelError::invalid_argument(
                    "null cannot be stored in a session",
                ))
            }
            serde_json::Value::Bool(b) => SessionValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => SessionValue::Int(i),
                None => SessionValue::Float(n.as_f64().unwrap_or_default()),
            },
            serde_json::Value::String(s) => SessionValue::Text(s),
            serde_json::Value::Array(items) => SessionValue::List(
                items
                    .into_iter()
                    .map(SessionValue::try_from)
                    .collect::<SatchelResult<_>>()?,
            ),
            serde_json::Value::Object(fields) => {
                let mut map = SessionMap::new();
                for (key, field) in fields {
                    map.insert(key, SessionValue::try_from(field)?);
                }
                SessionValue::Map(map)
            }
        })
    }
}

impl fmt::Display for SessionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionValue::Text(s) => f.write_str(s),
            SessionValue::Int(n) => write!(f, "{}", n),
            SessionValue::Float(x) => write!(f, "{}", x),
            SessionValue::Bool(b) => write!(f, "{}", b),
            SessionValue::Timestamp(t) => f.write_str(&t.to_rfc3339()),
            SessionValue::List(_) | SessionValue::Map(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<&str> for SessionValue {
    fn from(value: &str) -> Self {
        SessionValue::Text(value.to_string())
    }
}

impl From<String> for SessionValue {
    fn from(value: String) -> Self {
        SessionValue::Text(value)
    }
}

impl From<i64> for SessionValue {
    fn from(value: i64) -> Self {
        SessionValue::Int(value)
    }
}

impl From<i32> for SessionValue {
    fn from(value: i32) -> Self {
        SessionValue::Int(value.into())
    }
}

impl From<f64> for SessionValue {
    fn from(value: f64) -> Self {
        SessionValue::Float(value)
    }
}

impl From<bool> for SessionValue {
    fn from(value: bool) -> Self {
        SessionValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for SessionValue {
    fn from(value: DateTime<Utc>) -> Self {
        SessionValue::Timestamp(value)
    }
}

impl From<SessionMap> for SessionValue {
    fn from(value: SessionMap) -> Self {
        SessionValue::Map(value)
    }
}

impl From<Vec<SessionValue>> for SessionValue {
    fn from(value: Vec<SessionValue>) -> Self {
        SessionValue::List(value)
    }
}
