//! Reactive CRUD store for rstore.
//!
//! Keeps a local, observable cache of entities in step with a remote
//! collection API.
//!
//! # Components
//!
//! - **Backend**: [`RemoteCollection`] abstracts list/fetch/create/update/delete.
//!   [`HttpCollection`] speaks JSON over HTTP; [`backend::mock`] scripts replies
//!   for tests.
//! - **Channels**: state subscriptions start from the current value and then
//!   yield every change in order ([`StateStream`]); event subscriptions only
//!   see later events ([`EventStream`]). Both buffer up to
//!   [`StoreConfig::event_capacity`](rstore_model::StoreConfig) undelivered
//!   values, after which a slow subscriber receives `Lagged(n)`.
//! - **Store**: [`Store`] runs the operations, merges results into the cache
//!   and turns every outcome into a channel emission. Failures never surface
//!   as return values.
//!
//! # Example
//!
//! ```no_run
//! use rstore_core::{HttpClientConfig, Store};
//! use rstore_model::{EntityKey, Identifiable, LoadOptions, StoreConfig};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Note {
//!     id: i64,
//!     title: String,
//! }
//!
//! impl Identifiable for Note {
//!     fn unique_id(&self) -> EntityKey {
//!         EntityKey::Int(self.id)
//!     }
//! }
//!
//! # async fn run() -> Result<(), rstore_core::TransportError> {
//! let store: Store<Note> = Store::http(
//!     StoreConfig::new("/api/notes/", "Notes"),
//!     HttpClientConfig::with_base_url("https://notes.example.org"),
//! )?;
//!
//! let mut errors = store.load_errors();
//! store.load(LoadOptions::new().order("title")).await;
//! if let Ok(error) = errors.try_recv() {
//!     eprintln!("{error}");
//! }
//! println!("{} notes", store.len());
//! # Ok(())
//! # }
//! ```

pub mod backend;
mod channel;
mod error;
mod http;
mod store;

pub use backend::RemoteCollection;
pub use channel::{EventStream, RecvError, StateStream, TryRecvError};
pub use error::{StoreError, StoreErrorKind, TransportError, TransportResult};
pub use http::{HttpClientConfig, HttpCollection};
pub use store::{Snapshot, Store};
