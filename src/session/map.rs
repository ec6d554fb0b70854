//! The per-client session map

use crate::error::{SatchelError, SatchelResult};
use crate::session::path::KeyPath;
use crate::session::value::SessionValue;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// Mapping from session keys to values; nested keys live in nested maps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionMap(BTreeMap<String, SessionValue>);

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Top-level lookup, no path resolution
    pub fn get(&self, key: &str) -> Option<&SessionValue> {
        self.0.get(key)
    }

    /// Top-level insert, no path resolution
    pub fn insert(&mut self, key: impl Into<String>, value: SessionValue) -> Option<SessionValue> {
        self.0.insert(key.into(), value)
    }

    /// Top-level removal, no path resolution
    pub fn remove(&mut self, key: &str) -> Option<SessionValue> {
        self.0.remove(key)
    }

    /// Look up a resolved path. A non-map value in the middle of the path
    /// reads as absent.
    pub fn get_path(&self, path: &KeyPath) -> Option<&SessionValue> {
        match path {
            KeyPath::TopLevel(key) => self.0.get(key),
            KeyPath::Nested2(a, b) => self.0.get(a)?.as_map()?.get(b),
            KeyPath::Nested3(a, b, c) => self.0.get(a)?.as_map()?.get(b)?.as_map()?.get(c),
        }
    }

    /// Store under a resolved path, creating intermediate maps as needed
    pub fn insert_path(&mut self, path: &KeyPath, value: SessionValue) -> SatchelResult<()> {
        match path {
            KeyPath::TopLevel(key) => {
                self.0.insert(key.clone(), value);
            }
            KeyPath::Nested2(a, b) => {
                self.child_map(a, path)?.0.insert(b.clone(), value);
            }
            KeyPath::Nested3(a, b, c) => {
                self.child_map(a, path)?
                    .child_map(b, path)?
                    .0
                    .insert(c.clone(), value);
            }
        }
        Ok(())
    }

    /// Remove a resolved path, returning what was stored there
    pub fn remove_path(&mut self, path: &KeyPath) -> Option<SessionValue> {
        match path {
            KeyPath::TopLevel(key) => self.0.remove(key),
            KeyPath::Nested2(a, b) => self.0.get_mut(a)?.as_map_mut()?.remove(b),
            KeyPath::Nested3(a, b, c) => self
                .0
                .get_mut(a)?
                .as_map_mut()?
                .0
                .get_mut(b)?
                .as_map_mut()?
                .remove(c),
        }
    }

    /// Plain JSON view without type tags
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(key, value)| (key.clone(), value.to_json()))
                .collect(),
        )
    }

    fn child_map(&mut self, key: &str, path: &KeyPath) -> SatchelResult<&mut SessionMap> {
        let slot = self
            .0
            .entry(key.to_string())
            .or_insert_with(|| SessionValue::Map(SessionMap::new()));

        match slot {
            SessionValue::Map(map) => Ok(map),
            other => Err(SatchelError::invalid_argument(format!(
                "cannot write '{}': '{}' holds a {} value, not a map",
                path,
                key,
                other.type_name()
            ))),
        }
    }
}

impl<'a> IntoIterator for &'a SessionMap {
    type Item = (&'a String, &'a SessionValue);
    type IntoIter = btree_map::Iter<'a, String, SessionValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, SessionValue)> for SessionMap {
    fn from_iter<I: IntoIterator<Item = (String, SessionValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
