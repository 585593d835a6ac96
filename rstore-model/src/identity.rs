use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier of a cached entity.
///
/// Remote collections key their records either by number or by string, so
/// both are accepted. The `Display` form is the bare value and is what gets
/// appended to a resource URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityKey {
    Int(i64),
    Text(String),
}

impl EntityKey {
    /// Returns the numeric key, if this is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            EntityKey::Int(n) => Some(*n),
            EntityKey::Text(_) => None,
        }
    }

    /// Returns the string key, if this is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            EntityKey::Int(_) => None,
            EntityKey::Text(s) => Some(s),
        }
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Int(n) => write!(f, "{n}"),
            EntityKey::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityKey {
    fn from(n: i64) -> Self {
        EntityKey::Int(n)
    }
}

impl From<&str> for EntityKey {
    fn from(s: &str) -> Self {
        EntityKey::Text(s.to_string())
    }
}

impl From<String> for EntityKey {
    fn from(s: String) -> Self {
        EntityKey::Text(s)
    }
}

/// Capability every cached entity type provides.
///
/// The key must be stable for the entity's lifetime: the store indexes,
/// replaces and removes cache entries by it.
pub trait Identifiable {
    fn unique_id(&self) -> EntityKey;

    /// True when both values denote the same record.
    fn same_entity(&self, other: &Self) -> bool {
        self.unique_id() == other.unique_id()
    }
}
