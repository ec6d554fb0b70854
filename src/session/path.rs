//! Dotted key paths and how each operation resolves them

use serde::{Deserialize, Serialize};
use std::fmt;

/// A session key split into at most three levels
///
/// `"a"` is top-level, `"a.b"` and `"a.b.c"` address nested maps. Any other
/// number of segments is treated as a literal top-level key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPath {
    TopLevel(String),
    Nested2(String, String),
    Nested3(String, String, String),
}

impl KeyPath {
    /// Parse a dotted identifier. Empty segments are kept as-is.
    pub fn parse(id: &str) -> Self {
        let segments: Vec<&str> = id.split('.').collect();
        match segments.as_slice() {
            [first, second] => KeyPath::Nested2(first.to_string(), second.to_string()),
            [first, second, third] => {
                KeyPath::Nested3(first.to_string(), second.to_string(), third.to_string())
            }
            _ => KeyPath::TopLevel(id.to_string()),
        }
    }

    /// Number of map levels the path descends through
    pub fn depth(&self) -> usize {
        match self {
            KeyPath::TopLevel(_) => 1,
            KeyPath::Nested2(..) => 2,
            KeyPath::Nested3(..) => 3,
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPath::TopLevel(key) => f.write_str(key),
            KeyPath::Nested2(a, b) => write!(f, "{}.{}", a, b),
            KeyPath::Nested3(a, b, c) => write!(f, "{}.{}.{}", a, b, c),
        }
    }
}

/// Operation a key is being resolved for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOp {
    Read,
    Write,
    Destroy,
}

/// How write and destroy treat dotted keys
///
/// `Legacy` keeps the historical behavior: three-segment writes land under
/// the literal dotted key and destroy never descends. `Uniform` resolves the
/// parsed path for every operation. Reads always descend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NestingPolicy {
    #[default]
    Legacy,
    Uniform,
}

impl NestingPolicy {
    /// Resolve `id` for `op` under this policy
    pub fn resolve(self, op: KeyOp, id: &str) -> KeyPath {
        match (self, op, KeyPath::parse(id)) {
            (NestingPolicy::Uniform, _, path) | (NestingPolicy::Legacy, KeyOp::Read, path) => path,
            (NestingPolicy::Legacy, KeyOp::Write, KeyPath::Nested3(..)) => {
                KeyPath::TopLevel(id.to_string())
            }
            (NestingPolicy::Legacy, KeyOp::Write, path) => path,
            (NestingPolicy::Legacy, KeyOp::Destroy, _) => KeyPath::TopLevel(id.to_string()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            NestingPolicy::Legacy => "legacy",
            NestingPolicy::Uniform => "uniform",
        }
    }
}
