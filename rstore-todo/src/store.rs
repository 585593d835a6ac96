//! Todo store.
//!
//! Wraps a generic [`Store<Todo>`] and overrides the writes that need a
//! backend. In [`TodoMode::Local`] those writes mutate the cache directly and
//! fire the same events the remote path would; in [`TodoMode::Remote`] they
//! go through the generic store unchanged. Subscriptions always come from the
//! wrapped store, so switching modes does not change what consumers observe.

use crate::todo::Todo;
use rstore_core::{HttpClientConfig, Store, TransportResult};
use rstore_model::StoreConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Collection location of todos.
pub const TODO_RESOURCE_URL: &str = "/api/todos/";

/// Display name of todos in error messages.
pub const TODO_ITEM_NAME: &str = "Todos";

/// Where todo writes go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoMode {
    /// No backend yet: writes stay in the cache.
    #[default]
    Local,
    /// Writes go to the backend.
    Remote,
}

/// Clones share the wrapped store, the mode and the local id counter.
#[derive(Clone)]
pub struct TodoStore {
    store: Store<Todo>,
    mode: Arc<watch::Sender<TodoMode>>,
    // Last id handed out locally.
    last_id: Arc<AtomicI64>,
}

impl TodoStore {
    pub fn new(store: Store<Todo>, mode: TodoMode) -> Self {
        Self {
            store,
            mode: Arc::new(watch::Sender::new(mode)),
            last_id: Arc::new(AtomicI64::new(0)),
        }
    }

    /// A todo store over HTTP, using [`TodoStore::config`].
    pub fn http(http: HttpClientConfig, mode: TodoMode) -> TransportResult<Self> {
        Ok(Self::new(Store::http(Self::config(), http)?, mode))
    }

    pub fn config() -> StoreConfig {
        StoreConfig::new(TODO_RESOURCE_URL, TODO_ITEM_NAME)
    }

    /// The wrapped store: loads, gets, deletes, selection, lookups and every
    /// subscription.
    pub fn store(&self) -> &Store<Todo> {
        &self.store
    }

    pub fn mode(&self) -> TodoMode {
        *self.mode.borrow()
    }

    /// Switches where writes go, for this handle and every clone of it.
    pub fn set_mode(&self, mode: TodoMode) {
        debug!(?mode, "todo store mode changed");
        self.mode.send_replace(mode);
    }

    /// Current mode followed by every later switch.
    pub fn watch_mode(&self) -> watch::Receiver<TodoMode> {
        self.mode.subscribe()
    }

    /// Stores a new todo.
    ///
    /// Locally the todo gets the next id, larger than any id handed out or
    /// cached so far. Once no such id fits in an `i64` the todo is dropped
    /// with a warning and nothing is emitted.
    pub async fn add(&self, todo: Todo) {
        match self.mode() {
            TodoMode::Remote => self.store.add(todo).await,
            TodoMode::Local => {
                let Some(id) = self.next_id() else {
                    warn!(text = %todo.text, "local todo ids exhausted, todo not added");
                    return;
                };
                let todo = Todo { id, ..todo };
                debug!(id = todo.id, "adding todo locally");
                self.store.replace_or_add(todo.clone());
                self.store.notify_created(todo);
            }
        }
    }

    /// Shorthand for adding an open todo with the given text.
    pub async fn add_text(&self, text: impl Into<String>) {
        self.add(Todo::new(text)).await;
    }

    pub async fn update(&self, todo: Todo) {
        match self.mode() {
            TodoMode::Remote => self.store.update(todo).await,
            TodoMode::Local => {
                debug!(id = todo.id, "updating todo locally");
                self.store.replace_or_add(todo.clone());
                self.store.notify_updated(todo);
            }
        }
    }

    /// Marks a todo done.
    ///
    /// Locally a completed todo leaves the cache and is announced as deleted.
    /// Remotely it is updated with `completed` set.
    pub async fn complete(&self, todo: Todo) {
        match self.mode() {
            TodoMode::Remote => {
                self.store
                    .update(Todo {
                        completed: true,
                        ..todo
                    })
                    .await
            }
            TodoMode::Local => {
                debug!(id = todo.id, "completing todo locally");
                self.store.remove(&todo);
                self.store.notify_deleted(todo);
            }
        }
    }

    /// Cached todos not yet completed, in cache order.
    pub fn open_todos(&self) -> Vec<Todo> {
        self.store
            .snapshot()
            .iter()
            .filter(|t| !t.completed)
            .cloned()
            .collect()
    }

    fn next_id(&self) -> Option<i64> {
        let cached = self.store.snapshot().iter().map(|t| t.id).max().unwrap_or(0);
        self.last_id.fetch_max(cached, Ordering::SeqCst);
        self.last_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| last.checked_add(1))
            .ok()
            .map(|last| last + 1)
    }
}
