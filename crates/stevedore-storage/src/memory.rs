//! In-memory object store for tests.
//!
//! # Design
//! - Ordered map so listings come back in lexicographic key order, matching
//!   how S3 returns keys.
//! - Small configurable page size and per-key fault injection let tests
//!   exercise the pagination loop and partial-failure handling.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use crate::client::{ObjectPage, ObjectStore};
use crate::error::{StorageError, StorageResult};

const DEFAULT_PAGE_SIZE: usize = 1000;

/// Object store held entirely in memory.
pub struct MemoryObjectStore {
    objects: Mutex<BTreeMap<String, Bytes>>,
    failing: Mutex<BTreeSet<String>>,
    page_size: usize,
}

impl MemoryObjectStore {
    /// Create an empty store with the default listing page size.
    #[must_use]
    pub fn new() -> Self {
        Self {
            objects: Mutex::new(BTreeMap::new()),
            failing: Mutex::new(BTreeSet::new()),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Create an empty store that lists at most `page_size` keys per page.
    ///
    /// # Panics
    ///
    /// Panics if `page_size` is zero.
    #[must_use]
    pub fn with_page_size(page_size: usize) -> Self {
        assert!(page_size > 0, "page size must be positive");
        Self {
            objects: Mutex::new(BTreeMap::new()),
            failing: Mutex::new(BTreeSet::new()),
            page_size,
        }
    }

    /// Make every put and get of `key` fail with a backend error.
    pub fn inject_failure(&self, key: impl Into<String>) {
        self.failing
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.into());
    }

    /// Insert an object directly, bypassing fault injection.
    pub fn insert(&self, key: impl Into<String>, body: impl Into<Bytes>) {
        self.objects
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(key.into(), body.into());
    }

    /// Number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether the store holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Body of the object at `key`, if present.
    #[must_use]
    pub fn object(&self, key: &str) -> Option<Bytes> {
        self.objects
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// All stored keys in lexicographic order.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }

    fn is_failing(&self, key: &str) -> bool {
        self.failing
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .contains(key)
    }
}

impl Default for MemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put_object(&self, key: &str, body: Bytes) -> StorageResult<()> {
        if self.is_failing(key) {
            return Err(StorageError::Backend {
                operation: "PutObject",
                key: key.to_owned(),
                message: "injected fault".to_owned(),
            });
        }
        self.insert(key, body);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> StorageResult<Bytes> {
        if self.is_failing(key) {
            return Err(StorageError::Backend {
                operation: "GetObject",
                key: key.to_owned(),
                message: "injected fault".to_owned(),
            });
        }
        self.object(key).ok_or_else(|| StorageError::ObjectMissing {
            key: key.to_owned(),
        })
    }

    async fn list_page(
        &self,
        prefix: &str,
        continuation: Option<String>,
    ) -> StorageResult<ObjectPage> {
        let objects = self
            .objects
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let matching = objects.keys().filter(|key| key.starts_with(prefix));

        // Continuation tokens are the last key of the previous page, which
        // mirrors how S3 orders `StartAfter` style listings.
        let after = continuation.unwrap_or_default();
        let page: Vec<String> = matching
            .filter(|key| key.as_str() > after.as_str())
            .take(self.page_size)
            .cloned()
            .collect();

        let continuation = if page.len() == self.page_size {
            page.last().cloned()
        } else {
            None
        };
        Ok(ObjectPage {
            keys: page,
            continuation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_and_returns_bodies() -> StorageResult<()> {
        let store = MemoryObjectStore::new();
        store.put_object("dep/a.txt", Bytes::from_static(b"alpha")).await?;

        assert_eq!(store.get_object("dep/a.txt").await?, Bytes::from_static(b"alpha"));
        assert!(matches!(
            store.get_object("dep/missing").await,
            Err(StorageError::ObjectMissing { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn lists_in_pages_until_exhausted() -> StorageResult<()> {
        let store = MemoryObjectStore::with_page_size(2);
        for name in ["a", "b", "c", "d", "e"] {
            store.insert(format!("dep/{name}"), Bytes::new());
        }
        store.insert("other/z", Bytes::new());

        let mut keys = Vec::new();
        let mut continuation = None;
        let mut pages = 0;
        loop {
            let page = store.list_page("dep/", continuation).await?;
            pages += 1;
            keys.extend(page.keys);
            match page.continuation {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        assert_eq!(keys, vec!["dep/a", "dep/b", "dep/c", "dep/d", "dep/e"]);
        assert!(pages >= 3);
        Ok(())
    }

    #[tokio::test]
    async fn injected_faults_fail_both_directions() {
        let store = MemoryObjectStore::new();
        store.insert("dep/bad", Bytes::from_static(b"x"));
        store.inject_failure("dep/bad");

        assert!(matches!(
            store.put_object("dep/bad", Bytes::new()).await,
            Err(StorageError::Backend { .. })
        ));
        assert!(matches!(
            store.get_object("dep/bad").await,
            Err(StorageError::Backend { .. })
        ));
    }
}
