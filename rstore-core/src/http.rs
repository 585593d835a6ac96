//! HTTP implementation of [`RemoteCollection`].
//!
//! Speaks the plain collection protocol:
//!
//! | Call | Request |
//! |------|---------|
//! | list | `GET {resource_url}?filter=&order=&page=&pageSize=` |
//! | fetch | `GET {resource_url}{key}` |
//! | create | `POST {resource_url}` with JSON body |
//! | update | `PUT {resource_url}{key}` with JSON body |
//! | delete | `DELETE {resource_url}{key}`, response body ignored |
//!
//! Any non-2xx answer becomes [`TransportError::Status`] carrying the body
//! text; nothing is retried.

use crate::backend::RemoteCollection;
use crate::error::{TransportError, TransportResult};
use async_trait::async_trait;
use reqwest::{Client, Response};
use rstore_model::{EntityKey, ListQuery, StoreConfig};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::time::Duration;
use tracing::debug;

/// HTTP client settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Prefixed to every resource URL, e.g. `https://example.org`.
    /// Empty means resource URLs are already absolute.
    pub base_url: String,
    /// Per-request timeout (seconds).
    pub timeout_secs: u64,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: 30,
        }
    }
}

impl HttpClientConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

/// A remote collection reached over HTTP with JSON bodies.
pub struct HttpCollection<T> {
    config: StoreConfig,
    http: HttpClientConfig,
    client: Client,
    _item: PhantomData<fn() -> T>,
}

impl<T> HttpCollection<T> {
    /// Builds the collection and its HTTP client.
    pub fn new(config: StoreConfig, http: HttpClientConfig) -> TransportResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(http.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            http,
            client,
            _item: PhantomData,
        })
    }

    /// Absolute location of the collection.
    pub fn collection_url(&self) -> TransportResult<String> {
        absolute(format!("{}{}", self.http.base_url, self.config.resource_url))
    }

    /// Absolute location of one item. String keys are percent-encoded.
    pub fn item_url(&self, key: &EntityKey) -> TransportResult<String> {
        absolute(format!("{}{}", self.http.base_url, self.config.item_url(key)))
    }

    /// Collection location with the list query appended.
    pub fn list_url(&self, query: &ListQuery) -> TransportResult<String> {
        let params = query
            .pairs()
            .iter()
            .map(|(name, value)| format!("{name}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");
        Ok(format!("{}?{params}", self.collection_url()?))
    }
}

fn absolute(url: String) -> TransportResult<String> {
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url)
    } else {
        Err(TransportError::InvalidUrl(url))
    }
}

async fn check_status(response: Response) -> TransportResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TransportError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn read_json<R: DeserializeOwned>(response: Response) -> TransportResult<R> {
    let bytes = check_status(response).await?.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl<T> RemoteCollection<T> for HttpCollection<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn list(&self, query: &ListQuery) -> TransportResult<Vec<T>> {
        let url = self.list_url(query)?;
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }

    async fn fetch(&self, key: &EntityKey) -> TransportResult<T> {
        let url = self.item_url(key)?;
        debug!("GET {url}");
        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }

    async fn create(&self, item: &T) -> TransportResult<T> {
        let url = self.collection_url()?;
        debug!("POST {url}");
        let response = self.client.post(&url).json(item).send().await?;
        read_json(response).await
    }

    async fn update(&self, key: &EntityKey, item: &T) -> TransportResult<T> {
        let url = self.item_url(key)?;
        debug!("PUT {url}");
        let response = self.client.put(&url).json(item).send().await?;
        read_json(response).await
    }

    async fn delete(&self, key: &EntityKey) -> TransportResult<()> {
        let url = self.item_url(key)?;
        debug!("DELETE {url}");
        let response = self.client.delete(&url).send().await?;
        check_status(response).await?;
        Ok(())
    }
}
