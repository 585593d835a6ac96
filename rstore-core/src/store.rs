//! The reactive store engine.
//!
//! A [`Store`] owns an ordered, key-unique cache of `T`, an optional
//! selection and two in-flight flags, and keeps the cache consistent with the
//! outcome of remote calls. Nothing is applied optimistically: the cache only
//! changes once the backend has answered.
//!
//! Operations return `()`. Outcomes are observed by subscribing:
//!
//! State subscriptions yield the current value first, then every change in
//! order. Event subscriptions see only what happens after they subscribe.
//! Either kind reports `Lagged(n)` once more than
//! [`StoreConfig::event_capacity`] values are left undelivered.
//!
//! | Subscription | Carries | Replays latest |
//! |--------------|---------|----------------|
//! | [`items`](Store::items) | cache snapshot | yes |
//! | [`selected`](Store::selected) | selection | yes |
//! | [`loading`](Store::loading) | load/get/add/update in flight | yes |
//! | [`deleting`](Store::deleting) | delete in flight | yes |
//! | [`load_errors`](Store::load_errors) | failed loads | no |
//! | [`errors`](Store::errors) | failed get/add/update/delete | no |
//! | [`created`](Store::created) / [`updated`](Store::updated) | server representation | no |
//! | [`deleted`](Store::deleted) | the value passed to `delete` | no |
//! | [`empty_results`](Store::empty_results) | a load returned nothing | no |
//!
//! Operations of the same kind are neither serialized nor coalesced. Two
//! overlapping loads both apply, in the order their responses arrive, so an
//! earlier request answered last wins.

use crate::backend::RemoteCollection;
use crate::channel::{EventChannel, EventStream, FlagGuard, StateChannel, StateStream};
use crate::error::{StoreError, StoreErrorKind, TransportError, TransportResult};
use crate::http::{HttpClientConfig, HttpCollection};
use rstore_model::{EntityKey, Identifiable, LoadOptions, StoreConfig};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Immutable view of the cache at one point in time.
pub type Snapshot<T> = Arc<Vec<T>>;

/// Handle to a reactive store. Clones share the same cache and channels.
pub struct Store<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    config: StoreConfig,
    backend: Arc<dyn RemoteCollection<T>>,
    items: StateChannel<Snapshot<T>>,
    selected: StateChannel<Option<T>>,
    loading: StateChannel<bool>,
    deleting: StateChannel<bool>,
    load_errors: EventChannel<StoreError>,
    errors: EventChannel<StoreError>,
    created: EventChannel<T>,
    updated: EventChannel<T>,
    deleted: EventChannel<T>,
    empty_results: EventChannel<()>,
}

impl<T> Clone for Store<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for Store<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("config", &self.inner.config)
            .field("len", &self.inner.items.borrow().len())
            .field("loading", &*self.inner.loading.borrow())
            .field("deleting", &*self.inner.deleting.borrow())
            .finish()
    }
}

impl<T> Store<T>
where
    T: Identifiable + Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Creates a store backed by an [`HttpCollection`].
    pub fn http(config: StoreConfig, http: HttpClientConfig) -> TransportResult<Self> {
        let backend = HttpCollection::new(config.clone(), http)?;
        Ok(Self::new(config, Arc::new(backend)))
    }
}

impl<T> Store<T>
where
    T: Identifiable + Clone + Send + Sync + 'static,
{
    /// Creates an empty store over the given backend.
    pub fn new(config: StoreConfig, backend: Arc<dyn RemoteCollection<T>>) -> Self {
        let capacity = config.event_capacity;
        Self {
            inner: Arc::new(Inner {
                config,
                backend,
                items: StateChannel::new(Arc::new(Vec::new()), capacity),
                selected: StateChannel::new(None, capacity),
                loading: StateChannel::new(false, capacity),
                deleting: StateChannel::new(false, capacity),
                load_errors: EventChannel::new(capacity),
                errors: EventChannel::new(capacity),
                created: EventChannel::new(capacity),
                updated: EventChannel::new(capacity),
                deleted: EventChannel::new(capacity),
                empty_results: EventChannel::new(capacity),
            }),
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    // ── Remote operations ───────────────────────────────────────

    /// Lists the collection into the cache.
    ///
    /// With `use_cache` set and a non-empty cache this returns at once: no
    /// flag change, no remote call. The check is strict, there is no notion
    /// of staleness.
    pub async fn load(&self, options: LoadOptions) {
        if options.use_cache && !self.is_empty() {
            debug!(item = %self.inner.config.item_name, "load served from cache");
            return;
        }

        let _loading = FlagGuard::raise(&self.inner.loading);
        let query = options.query();
        debug!(item = %self.inner.config.item_name, ?query, "loading");

        match self.inner.backend.list(&query).await {
            Ok(items) => {
                let empty = items.is_empty();
                if options.append {
                    self.rewrite(|cache| cache.extend(items));
                } else {
                    self.inner.items.set(Arc::new(items));
                }
                if empty {
                    self.inner.empty_results.emit(());
                }
            }
            Err(e) => self.fail(StoreErrorKind::Load, e),
        }
    }

    /// Fetches one item, merges it into the cache and selects it.
    ///
    /// `None` clears the selection without a remote call.
    pub async fn get(&self, key: Option<EntityKey>) {
        let Some(key) = key else {
            self.select(None);
            return;
        };

        let _loading = FlagGuard::raise(&self.inner.loading);
        debug!(url = %self.inner.config.item_url(&key), "fetching");

        match self.inner.backend.fetch(&key).await {
            Ok(item) => {
                self.replace_or_add(item.clone());
                self.inner.selected.set(Some(item));
            }
            Err(e) => self.fail(StoreErrorKind::Fetch, e),
        }
    }

    /// Creates `item` remotely, then caches what the backend returned.
    pub async fn add(&self, item: T) {
        let _loading = FlagGuard::raise(&self.inner.loading);
        debug!(item = %self.inner.config.item_name, "creating");

        match self.inner.backend.create(&item).await {
            Ok(stored) => {
                self.replace_or_add(stored.clone());
                self.inner.created.emit(stored);
            }
            Err(e) => self.fail(StoreErrorKind::Create, e),
        }
    }

    /// Replaces `item` remotely, then caches what the backend returned.
    pub async fn update(&self, item: T) {
        let _loading = FlagGuard::raise(&self.inner.loading);
        let key = item.unique_id();
        debug!(url = %self.inner.config.item_url(&key), "updating");

        match self.inner.backend.update(&key, &item).await {
            Ok(stored) => {
                self.replace_or_add(stored.clone());
                self.inner.updated.emit(stored);
            }
            Err(e) => self.fail(StoreErrorKind::Update, e),
        }
    }

    /// Deletes `item` remotely, then drops it from the cache.
    ///
    /// The `deleted` event carries `item` itself; the backend's answer has no
    /// body to report.
    pub async fn delete(&self, item: T) {
        let _deleting = FlagGuard::raise(&self.inner.deleting);
        let key = item.unique_id();
        debug!(url = %self.inner.config.item_url(&key), "deleting");

        match self.inner.backend.delete(&key).await {
            Ok(()) => {
                self.remove(&item);
                self.inner.deleted.emit(item);
            }
            Err(e) => self.fail(StoreErrorKind::Delete, e),
        }
    }

    fn fail(&self, kind: StoreErrorKind, error: TransportError) {
        let error = StoreError::new(kind, &self.inner.config.item_name, error);
        warn!(%error, "store operation failed");
        match kind {
            StoreErrorKind::Load => self.inner.load_errors.emit(error),
            _ => self.inner.errors.emit(error),
        };
    }

    // ── Local operations ────────────────────────────────────────

    /// Sets or clears the selection. The cache is not touched.
    pub fn select(&self, item: Option<T>) {
        self.inner.selected.set(item);
    }

    /// Cached item with the given key.
    pub fn get_cached(&self, key: &EntityKey) -> Option<T> {
        self.find_cached(|item| item.unique_id() == *key)
    }

    /// First cached item matching `predicate`.
    pub fn find_cached(&self, predicate: impl Fn(&T) -> bool) -> Option<T> {
        self.inner.items.borrow().iter().find(|item| predicate(item)).cloned()
    }

    /// Empties the cache.
    pub fn clear_cached(&self) {
        self.inner.items.set(Arc::new(Vec::new()));
    }

    /// Replaces the cached item sharing `item`'s key, in place, or appends
    /// `item` when there is none. The whole entity is replaced.
    pub fn replace_or_add(&self, item: T) {
        let key = item.unique_id();
        self.rewrite(|cache| match cache.iter().position(|e| e.unique_id() == key) {
            Some(i) => cache[i] = item,
            None => cache.push(item),
        });
    }

    /// Drops every cached item sharing `item`'s key.
    pub fn remove(&self, item: &T) {
        let key = item.unique_id();
        self.rewrite(|cache| cache.retain(|e| e.unique_id() != key));
    }

    /// Emits a `created` event without a remote call.
    pub fn notify_created(&self, item: T) {
        self.inner.created.emit(item);
    }

    /// Emits an `updated` event without a remote call.
    pub fn notify_updated(&self, item: T) {
        self.inner.updated.emit(item);
    }

    /// Emits a `deleted` event without a remote call.
    pub fn notify_deleted(&self, item: T) {
        self.inner.deleted.emit(item);
    }

    // Copy-on-write: readers holding the old snapshot keep it unchanged.
    fn rewrite(&self, f: impl FnOnce(&mut Vec<T>)) {
        self.inner.items.modify(|snapshot| {
            let mut next = Vec::clone(snapshot);
            f(&mut next);
            *snapshot = Arc::new(next);
        });
    }

    // ── Current values ──────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot<T> {
        self.inner.items.get()
    }

    pub fn selection(&self) -> Option<T> {
        self.inner.selected.get()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.loading.get()
    }

    pub fn is_deleting(&self) -> bool {
        self.inner.deleting.get()
    }

    pub fn len(&self) -> usize {
        self.inner.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.items.borrow().is_empty()
    }

    // ── Subscriptions ───────────────────────────────────────────

    pub fn items(&self) -> StateStream<Snapshot<T>> {
        self.inner.items.subscribe()
    }

    pub fn selected(&self) -> StateStream<Option<T>> {
        self.inner.selected.subscribe()
    }

    pub fn loading(&self) -> StateStream<bool> {
        self.inner.loading.subscribe()
    }

    pub fn deleting(&self) -> StateStream<bool> {
        self.inner.deleting.subscribe()
    }

    pub fn load_errors(&self) -> EventStream<StoreError> {
        self.inner.load_errors.subscribe()
    }

    /// Failures of get, add, update and delete.
    pub fn errors(&self) -> EventStream<StoreError> {
        self.inner.errors.subscribe()
    }

    pub fn created(&self) -> EventStream<T> {
        self.inner.created.subscribe()
    }

    pub fn updated(&self) -> EventStream<T> {
        self.inner.updated.subscribe()
    }

    pub fn deleted(&self) -> EventStream<T> {
        self.inner.deleted.subscribe()
    }

    pub fn empty_results(&self) -> EventStream<()> {
        self.inner.empty_results.subscribe()
    }
}
