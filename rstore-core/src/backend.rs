//! Remote collection abstraction.
//!
//! A store talks to its backend only through [`RemoteCollection`], so the same
//! engine runs against the HTTP implementation ([`crate::HttpCollection`]) or
//! the scripted [`mock::MockCollection`] used in tests.

use crate::error::TransportResult;
use async_trait::async_trait;
use rstore_model::{EntityKey, ListQuery};

/// CRUD access to one remote collection of `T`.
#[async_trait]
pub trait RemoteCollection<T>: Send + Sync {
    /// Lists the collection with the given query parameters.
    async fn list(&self, query: &ListQuery) -> TransportResult<Vec<T>>;

    /// Fetches one item by key.
    async fn fetch(&self, key: &EntityKey) -> TransportResult<T>;

    /// Creates an item. Returns the representation the backend stored.
    async fn create(&self, item: &T) -> TransportResult<T>;

    /// Replaces the item at `key`. Returns the representation the backend stored.
    async fn update(&self, key: &EntityKey, item: &T) -> TransportResult<T>;

    /// Deletes the item at `key`.
    async fn delete(&self, key: &EntityKey) -> TransportResult<()>;
}

/// A scripted backend for testing.
pub mod mock {
    use super::*;
    use crate::error::TransportError;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::{mpsc, oneshot};

    /// A call received by the mock, with its arguments.
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call<T> {
        List(ListQuery),
        Fetch(EntityKey),
        Create(T),
        Update(EntityKey, T),
        Delete(EntityKey),
    }

    /// A scripted answer. Must match the kind of call that consumes it.
    #[derive(Debug)]
    pub enum Reply<T> {
        Items(Vec<T>),
        Item(T),
        Done,
        Fail(TransportError),
    }

    /// Answers calls from a FIFO of scripted replies.
    ///
    /// Each call records itself, then waits for the next reply in the queue.
    /// Replies queued with [`reply`](Self::reply) are ready at once; those
    /// queued with [`defer`](Self::defer) arrive when the test sends them,
    /// which lets a test decide the order in which responses land.
    pub struct MockCollection<T> {
        replies: Mutex<VecDeque<oneshot::Receiver<Reply<T>>>>,
        calls: Mutex<Vec<Call<T>>>,
        call_tx: mpsc::UnboundedSender<Call<T>>,
        call_rx: Mutex<Option<mpsc::UnboundedReceiver<Call<T>>>>,
    }

    impl<T: Clone> MockCollection<T> {
        pub fn new() -> Self {
            let (call_tx, call_rx) = mpsc::unbounded_channel();
            Self {
                replies: Mutex::new(VecDeque::new()),
                calls: Mutex::new(Vec::new()),
                call_tx,
                call_rx: Mutex::new(Some(call_rx)),
            }
        }

        /// Queues a reply that is available immediately.
        pub fn reply(&self, reply: Reply<T>) {
            let (tx, rx) = oneshot::channel();
            let _ = tx.send(reply);
            self.replies.lock().unwrap().push_back(rx);
        }

        /// Queues a reply slot and returns the sender that fills it.
        pub fn defer(&self) -> oneshot::Sender<Reply<T>> {
            let (tx, rx) = oneshot::channel();
            self.replies.lock().unwrap().push_back(rx);
            tx
        }

        /// Every call received so far, in order.
        pub fn calls(&self) -> Vec<Call<T>> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// Live feed of calls as they arrive. Can be taken once.
        pub fn take_call_feed(&self) -> Option<mpsc::UnboundedReceiver<Call<T>>> {
            self.call_rx.lock().unwrap().take()
        }

        fn record(&self, call: Call<T>) -> Option<oneshot::Receiver<Reply<T>>> {
            self.calls.lock().unwrap().push(call.clone());
            let _ = self.call_tx.send(call);
            self.replies.lock().unwrap().pop_front()
        }

        async fn answer(&self, call: Call<T>) -> TransportResult<Reply<T>> {
            let slot = self
                .record(call)
                .ok_or_else(|| TransportError::Network("no scripted reply".to_string()))?;
            let reply = slot
                .await
                .map_err(|_| TransportError::Network("scripted reply dropped".to_string()))?;
            match reply {
                Reply::Fail(e) => Err(e),
                other => Ok(other),
            }
        }
    }

    impl<T: Clone> Default for MockCollection<T> {
        fn default() -> Self {
            Self::new()
        }
    }

    fn mismatch(call: &str) -> TransportError {
        TransportError::Network(format!("scripted reply does not fit a {call} call"))
    }

    #[async_trait]
    impl<T> RemoteCollection<T> for MockCollection<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        async fn list(&self, query: &ListQuery) -> TransportResult<Vec<T>> {
            match self.answer(Call::List(query.clone())).await? {
                Reply::Items(items) => Ok(items),
                _ => Err(mismatch("list")),
            }
        }

        async fn fetch(&self, key: &EntityKey) -> TransportResult<T> {
            match self.answer(Call::Fetch(key.clone())).await? {
                Reply::Item(item) => Ok(item),
                _ => Err(mismatch("fetch")),
            }
        }

        async fn create(&self, item: &T) -> TransportResult<T> {
            match self.answer(Call::Create(item.clone())).await? {
                Reply::Item(item) => Ok(item),
                _ => Err(mismatch("create")),
            }
        }

        async fn update(&self, key: &EntityKey, item: &T) -> TransportResult<T> {
            match self.answer(Call::Update(key.clone(), item.clone())).await? {
                Reply::Item(item) => Ok(item),
                _ => Err(mismatch("update")),
            }
        }

        async fn delete(&self, key: &EntityKey) -> TransportResult<()> {
            match self.answer(Call::Delete(key.clone())).await? {
                Reply::Done => Ok(()),
                _ => Err(mismatch("delete")),
            }
        }
    }
}
