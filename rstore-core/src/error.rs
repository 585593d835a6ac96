//! Error types for the store layer.
//!
//! Two levels: [`TransportError`] is whatever went wrong talking to the
//! backend; [`StoreError`] is what a store emits on its error channels, the
//! transport error wrapped with the failed operation and a readable message.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Result type for backend calls.
pub type TransportResult<T> = Result<T, TransportError>;

/// Errors raised by a [`RemoteCollection`](crate::RemoteCollection).
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request could not be sent or the connection failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not the expected JSON.
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Transport-level failure without a more specific cause.
    #[error("network error: {0}")]
    Network(String),

    /// Resource location could not be formed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl TransportError {
    /// HTTP status code, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            TransportError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true for a 404 answer.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Operation category a [`StoreError`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorKind {
    Load,
    Fetch,
    Create,
    Update,
    Delete,
}

impl StoreErrorKind {
    fn verb(self) -> &'static str {
        match self {
            StoreErrorKind::Load => "loading",
            StoreErrorKind::Fetch => "retrieving",
            StoreErrorKind::Create => "creating",
            StoreErrorKind::Update => "updating",
            StoreErrorKind::Delete => "deleting",
        }
    }
}

/// A failed store operation, as delivered on a store's error channels.
///
/// Clonable so it can fan out to every subscriber; the transport error is
/// shared, not copied.
#[derive(Debug, Clone)]
pub struct StoreError {
    kind: StoreErrorKind,
    message: String,
    source: Arc<TransportError>,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, item_name: &str, source: TransportError) -> Self {
        Self {
            kind,
            message: format!("Error {} {}", kind.verb(), item_name),
            source: Arc::new(source),
        }
    }

    pub fn kind(&self) -> StoreErrorKind {
        self.kind
    }

    /// Readable message naming the action and the item, e.g. `Error loading Todos`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The underlying backend failure, unmodified.
    pub fn transport(&self) -> &TransportError {
        &self.source
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.source)
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}
