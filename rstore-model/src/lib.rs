//! Value and contract types shared by every rstore crate.
//!
//! - [`EntityKey`] / [`Identifiable`]: the unique-identity capability every
//!   cached entity type provides. Two entities are the same record iff their
//!   keys are equal, whatever their other fields hold.
//! - [`StoreConfig`]: where a store's resource lives and the display name used
//!   in error messages.
//! - [`LoadOptions`] / [`ListQuery`]: the arguments of a list load and the
//!   subset of them that travels to the backend.

mod config;
mod identity;
mod query;

pub use config::{DEFAULT_EVENT_CAPACITY, StoreConfig};
pub use identity::{EntityKey, Identifiable};
pub use query::{ListQuery, LoadOptions};
