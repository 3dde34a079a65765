//! The object store seam shared by real and test backends.
//!
//! # Design
//! - Pagination is part of the trait contract so callers own the
//!   continuation loop and test backends can exercise it with small pages.
//! - Bodies are [`Bytes`] end to end; the transfer engine handles files.

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StorageResult;

/// One page of an object listing.
#[derive(Debug, Clone, Default)]
pub struct ObjectPage {
    /// Keys in this page, in backend order.
    pub keys: Vec<String>,
    /// Continuation token for the next page, if any remain.
    pub continuation: Option<String>,
}

/// Backend-agnostic object store.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key`, replacing any existing object.
    async fn put_object(&self, key: &str, body: Bytes) -> StorageResult<()>;

    /// Fetch the full body of the object at `key`.
    async fn get_object(&self, key: &str) -> StorageResult<Bytes>;

    /// Fetch one listing page of keys under `prefix`.
    ///
    /// Pass the previous page's continuation token to advance; `None` starts
    /// from the beginning. A page with `continuation: None` is the last.
    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<String>,
    ) -> StorageResult<ObjectPage>;
}
