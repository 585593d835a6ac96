//! Store configuration.

use crate::EntityKey;
use serde::{Deserialize, Serialize};

/// Default buffer size of a store's event channels.
pub const DEFAULT_EVENT_CAPACITY: usize = 64;

/// Describes the remote resource a store mirrors.
///
/// Supplied once at construction; the store never changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Collection location, e.g. `/api/todos/`. Item locations are formed by
    /// appending the key directly, so a trailing slash is expected.
    pub resource_url: String,
    /// Human-readable name used in error messages, e.g. `Todos`.
    pub item_name: String,
    /// How many undelivered events each event channel buffers per subscriber.
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

fn default_event_capacity() -> usize {
    DEFAULT_EVENT_CAPACITY
}

impl StoreConfig {
    pub fn new(resource_url: impl Into<String>, item_name: impl Into<String>) -> Self {
        Self {
            resource_url: resource_url.into(),
            item_name: item_name.into(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }

    /// Overrides the event channel capacity. Zero is bumped to one.
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1);
        self
    }

    /// Location of a single item: `{resource_url}{key}`, with the key
    /// percent-encoded.
    pub fn item_url(&self, key: &EntityKey) -> String {
        format!(
            "{}{}",
            self.resource_url,
            urlencoding::encode(&key.to_string())
        )
    }
}
