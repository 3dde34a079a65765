//! Keyed bulk upload and download over an [`ObjectStore`].
//!
//! # Design
//! - Bounded fan-out via `buffer_unordered`; one slow object never blocks
//!   the rest of the batch.
//! - Batches always settle: per-object failures are collected, counted, and
//!   reported, never allowed to abort in-flight siblings.
//! - Listing failures during download are fatal for the batch because an
//!   incomplete listing would silently drop objects.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{self, StreamExt};
use stevedore_fstree::ObjectKey;
use tracing::{info, warn};

use crate::client::ObjectStore;
use crate::error::{StorageError, StorageResult};

const DEFAULT_MAX_CONCURRENT: usize = 16;

/// Tuning knobs shared by both transfer directions.
#[derive(Debug, Clone, Copy)]
pub struct TransferOptions {
    /// Maximum number of objects in flight at once.
    pub max_concurrent: usize,
}

impl TransferOptions {
    /// Options with the given fan-out bound.
    #[must_use]
    pub const fn new(max_concurrent: usize) -> Self {
        Self { max_concurrent }
    }

    const fn bound(self) -> usize {
        if self.max_concurrent == 0 {
            1
        } else {
            self.max_concurrent
        }
    }
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENT)
    }
}

/// One file to upload under a storage key.
#[derive(Debug, Clone)]
pub struct UploadTask {
    /// Destination key in the bucket.
    pub key: ObjectKey,
    /// Local file whose bytes become the object body.
    pub path: PathBuf,
}

/// One object that failed to transfer.
#[derive(Debug)]
pub struct TransferFailure {
    /// Key of the failed object.
    pub key: String,
    /// Error that sank it.
    pub error: StorageError,
}

/// Outcome of a settled transfer batch.
#[derive(Debug, Default)]
pub struct BatchResult {
    /// Objects transferred successfully.
    pub succeeded: usize,
    /// Objects that failed, with the error for each.
    pub failures: Vec<TransferFailure>,
}

impl BatchResult {
    /// Whether every object in the batch transferred.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn tally(results: Vec<Result<(), TransferFailure>>) -> Self {
        let mut batch = Self::default();
        for result in results {
            match result {
                Ok(()) => batch.succeeded += 1,
                Err(failure) => batch.failures.push(failure),
            }
        }
        batch
    }
}

/// Uploads batches of local files to an object store.
pub struct BulkUploader {
    store: Arc<dyn ObjectStore>,
    options: TransferOptions,
}

impl BulkUploader {
    /// Build an uploader over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, options: TransferOptions) -> Self {
        Self { store, options }
    }

    /// Upload every task, settling the whole batch before returning.
    ///
    /// Zero-length files are uploaded as empty objects. The result reports
    /// per-object failures; it never short-circuits.
    pub async fn upload_all(&self, tasks: Vec<UploadTask>) -> BatchResult {
        let total = tasks.len();
        let results: Vec<Result<(), TransferFailure>> = stream::iter(tasks)
            .map(|task| {
                let store = Arc::clone(&self.store);
                async move { upload_one(store.as_ref(), task).await }
            })
            .buffer_unordered(self.options.bound())
            .collect()
            .await;

        let batch = BatchResult::tally(results);
        if batch.is_complete() {
            info!(objects = total, "upload batch settled");
        } else {
            warn!(
                objects = total,
                failed = batch.failures.len(),
                "upload batch settled with failures"
            );
        }
        batch
    }
}

async fn upload_one(store: &dyn ObjectStore, task: UploadTask) -> Result<(), TransferFailure> {
    let key = task.key.as_str().to_owned();
    let body = match tokio::fs::read(&task.path).await {
        Ok(bytes) => Bytes::from(bytes),
        Err(error) => {
            return Err(TransferFailure {
                key,
                error: StorageError::io("read", task.path, error),
            });
        }
    };
    store
        .put_object(&key, body)
        .await
        .map_err(|error| TransferFailure { key, error })
}

/// Downloads every object under a prefix and rebuilds the file tree.
pub struct BulkDownloader {
    store: Arc<dyn ObjectStore>,
    options: TransferOptions,
}

impl BulkDownloader {
    /// Build a downloader over `store`.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, options: TransferOptions) -> Self {
        Self { store, options }
    }

    /// Download every object under `prefix` into `output_root`.
    ///
    /// The full listing is paginated before any bodies are fetched. Keys
    /// that are empty after the prefix, or that fail path validation, are
    /// recorded as failures without touching the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error only if a listing page cannot be fetched; per-object
    /// download failures are reported through the batch result instead.
    pub async fn download_all(
        &self,
        prefix: &str,
        output_root: &Path,
    ) -> StorageResult<BatchResult> {
        let mut keys = self.list_all(prefix).await?;
        // Directory markers and empty keys carry no file content.
        keys.retain(|key| !key.is_empty() && !key.ends_with('/'));
        let total = keys.len();

        let results: Vec<Result<(), TransferFailure>> = stream::iter(keys)
            .map(|key| {
                let store = Arc::clone(&self.store);
                let output_root = output_root.to_path_buf();
                async move { download_one(store.as_ref(), key, &output_root).await }
            })
            .buffer_unordered(self.options.bound())
            .collect()
            .await;

        let batch = BatchResult::tally(results);
        if batch.is_complete() {
            info!(prefix = %prefix, objects = total, "download batch settled");
        } else {
            warn!(
                prefix = %prefix,
                objects = total,
                failed = batch.failures.len(),
                "download batch settled with failures"
            );
        }
        Ok(batch)
    }

    async fn list_all(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        let mut continuation = None;
        loop {
            let page = self.store.list_page(prefix, continuation).await?;
            keys.extend(page.keys);
            match page.continuation {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }
        Ok(keys)
    }
}

async fn download_one(
    store: &dyn ObjectStore,
    key: String,
    output_root: &Path,
) -> Result<(), TransferFailure> {
    let parsed = match ObjectKey::parse(key.clone()) {
        Ok(parsed) => parsed,
        Err(source) => {
            return Err(TransferFailure {
                key,
                error: StorageError::Key { source },
            });
        }
    };
    let target = parsed.local_target(output_root);

    let body = store
        .get_object(&key)
        .await
        .map_err(|error| TransferFailure {
            key: key.clone(),
            error,
        })?;

    if let Some(parent) = target.parent() {
        if let Err(error) = tokio::fs::create_dir_all(parent).await {
            return Err(TransferFailure {
                key,
                error: StorageError::io("create_dir_all", parent.to_path_buf(), error),
            });
        }
    }
    tokio::fs::write(&target, &body)
        .await
        .map_err(|error| TransferFailure {
            key,
            error: StorageError::io("write", target, error),
        })
}
