//! Shared test helpers for store tests.

#![allow(dead_code)]

use rstore_core::Store;
use rstore_core::backend::mock::MockCollection;
use rstore_model::{EntityKey, Identifiable, StoreConfig};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub text: String,
}

impl Identifiable for Item {
    fn unique_id(&self) -> EntityKey {
        EntityKey::Int(self.id)
    }
}

pub fn item(id: i64, text: &str) -> Item {
    Item {
        id,
        text: text.to_string(),
    }
}

pub fn config() -> StoreConfig {
    StoreConfig::new("/api/items/", "Items")
}

/// A store over a fresh mock, plus the mock for scripting replies.
pub fn mock_store() -> (Store<Item>, Arc<MockCollection<Item>>) {
    let mock = Arc::new(MockCollection::new());
    let store = Store::new(config(), mock.clone());
    (store, mock)
}

/// Ids currently cached, in cache order.
pub fn ids(store: &Store<Item>) -> Vec<i64> {
    store.snapshot().iter().map(|i| i.id).collect()
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
