//! Todo entity and its store.
//!
//! [`TodoStore`] binds the generic rstore engine to [`Todo`] and can run
//! without a backend: new todos get locally generated ids and completing a
//! todo removes it from the cache. Switching to [`TodoMode::Remote`] hands
//! writes back to the generic store with no change to the observable
//! surface.

mod store;
mod todo;

pub use store::{TODO_ITEM_NAME, TODO_RESOURCE_URL, TodoMode, TodoStore};
pub use todo::Todo;
