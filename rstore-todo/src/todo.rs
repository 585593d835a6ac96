use rstore_model::{EntityKey, Identifiable};
use serde::{Deserialize, Serialize};

/// A todo item.
///
/// `id` is 0 until the item has been stored, either by the backend or by the
/// local id counter of [`TodoStore`](crate::TodoStore).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    #[serde(default)]
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

impl Todo {
    /// An unsaved, open todo.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: 0,
            text: text.into(),
            completed: false,
        }
    }
}

impl Identifiable for Todo {
    fn unique_id(&self) -> EntityKey {
        EntityKey::Int(self.id)
    }
}
