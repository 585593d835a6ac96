//! Publish/subscribe primitives behind a store's observable surface.
//!
//! State (cache, selection, flags) lives in a [`StateChannel`]: the current
//! value sits in a `tokio::sync::watch` channel and every published value is
//! also fanned out over a `tokio::sync::broadcast` channel. A new subscriber
//! first receives the current value, then each later value in publication
//! order. Events (errors, successes, empty results) go through an
//! [`EventChannel`]: a plain `broadcast` channel, so subscribers only see
//! what is emitted after they subscribed.
//!
//! Both kinds of subscription buffer at most the store's event capacity of
//! undelivered values. A subscriber that falls further behind gets
//! [`RecvError::Lagged`] (or [`TryRecvError::Lagged`]) with the number of
//! values it missed, then resumes with the oldest value still buffered.

use tokio::sync::{broadcast, watch};

pub use tokio::sync::broadcast::error::{RecvError, TryRecvError};

/// Subscription to an event channel. No replay.
///
/// A subscriber that stops draining it lags once the buffer is full: it
/// gets `Lagged(n)` for the `n` oldest events it lost.
pub type EventStream<V> = broadcast::Receiver<V>;

/// Subscription to a state channel.
///
/// [`recv`](Self::recv) yields the value current at subscription time, then
/// every value published afterwards, in order. [`borrow`](Self::borrow)
/// always shows the latest value, whatever has been received so far.
pub struct StateStream<V> {
    replay: Option<V>,
    changes: broadcast::Receiver<V>,
    latest: watch::Receiver<V>,
}

impl<V: Clone> StateStream<V> {
    /// Next value in publication order, waiting if there is none yet.
    pub async fn recv(&mut self) -> Result<V, RecvError> {
        match self.replay.take() {
            Some(value) => Ok(value),
            None => self.changes.recv().await,
        }
    }

    /// Next value in publication order, if one is ready.
    pub fn try_recv(&mut self) -> Result<V, TryRecvError> {
        match self.replay.take() {
            Some(value) => Ok(value),
            None => self.changes.try_recv(),
        }
    }

    /// The latest published value.
    pub fn borrow(&self) -> watch::Ref<'_, V> {
        self.latest.borrow()
    }
}

impl<V> std::fmt::Debug for StateStream<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateStream")
            .field("replay_pending", &self.replay.is_some())
            .field("buffered", &self.changes.len())
            .finish()
    }
}

pub(crate) struct StateChannel<V> {
    tx: watch::Sender<V>,
    changes: broadcast::Sender<V>,
}

impl<V: Clone> StateChannel<V> {
    pub(crate) fn new(initial: V, capacity: usize) -> Self {
        let (tx, _) = watch::channel(initial);
        let (changes, _) = broadcast::channel(capacity.max(1));
        Self { tx, changes }
    }

    /// Publishes a new value, whether or not anyone listens.
    pub(crate) fn set(&self, value: V) {
        self.modify(|current| *current = value);
    }

    /// Rewrites the value in place and publishes the result.
    ///
    /// The fan-out happens under the watch lock, so a concurrent
    /// [`subscribe`](Self::subscribe) sees each value exactly once.
    pub(crate) fn modify(&self, f: impl FnOnce(&mut V)) {
        self.tx.send_modify(|current| {
            f(current);
            let _ = self.changes.send(current.clone());
        });
    }

    pub(crate) fn borrow(&self) -> watch::Ref<'_, V> {
        self.tx.borrow()
    }

    pub(crate) fn get(&self) -> V {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> StateStream<V> {
        let latest = self.tx.subscribe();
        let current = self.tx.borrow();
        let changes = self.changes.subscribe();
        StateStream {
            replay: Some(current.clone()),
            changes,
            latest,
        }
    }
}

pub(crate) struct EventChannel<V> {
    tx: broadcast::Sender<V>,
}

impl<V: Clone> EventChannel<V> {
    pub(crate) fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Delivers to current subscribers. Returns how many there were.
    pub(crate) fn emit(&self, value: V) -> usize {
        self.tx.send(value).unwrap_or(0)
    }

    pub(crate) fn subscribe(&self) -> EventStream<V> {
        self.tx.subscribe()
    }
}

/// Holds a flag up for as long as it lives.
///
/// Dropping it (normal return or a dropped future) clears the flag.
pub(crate) struct FlagGuard<'a> {
    flag: &'a StateChannel<bool>,
}

impl<'a> FlagGuard<'a> {
    pub(crate) fn raise(flag: &'a StateChannel<bool>) -> Self {
        flag.set(true);
        Self { flag }
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}
