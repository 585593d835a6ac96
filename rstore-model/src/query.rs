//! Arguments of a list load.

use serde::{Deserialize, Serialize};

/// The query parameters forwarded to the backend's list endpoint.
///
/// Values are passed through untouched; the store does not interpret
/// filters, ordering or paging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub filter: String,
    pub order: String,
    pub page: u32,
    pub page_size: u32,
}

impl ListQuery {
    /// Parameter names and values in wire order:
    /// `filter`, `order`, `page`, `pageSize`.
    pub fn pairs(&self) -> [(&'static str, String); 4] {
        [
            ("filter", self.filter.clone()),
            ("order", self.order.clone()),
            ("page", self.page.to_string()),
            ("pageSize", self.page_size.to_string()),
        ]
    }
}

/// Options of `Store::load`.
///
/// Every field defaults to its zero value: no filter, no ordering, page 0,
/// page size 0, always hit the backend, replace the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadOptions {
    pub filter: String,
    pub order: String,
    pub page: u32,
    pub page_size: u32,
    /// Skip the remote call entirely when the cache already holds items.
    pub use_cache: bool,
    /// Concatenate the result onto the cache instead of replacing it.
    pub append: bool,
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn order(mut self, order: impl Into<String>) -> Self {
        self.order = order.into();
        self
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    pub fn use_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    pub fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    /// The part of these options that travels to the backend.
    pub fn query(&self) -> ListQuery {
        ListQuery {
            filter: self.filter.clone(),
            order: self.order.clone(),
            page: self.page,
            page_size: self.page_size,
        }
    }
}
