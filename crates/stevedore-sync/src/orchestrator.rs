//! The synchronization pipeline.
//!
//! # Design
//! - The orchestrator owns only the store handle and transfer options; each
//!   call is self-contained and safe to run concurrently.
//! - Scans complete before any upload starts, so a failed scan costs no
//!   partial writes to the bucket.

use std::path::Path;
use std::sync::Arc;

use stevedore_fstree::{DeploymentId, ObjectKey, collect_files};
use stevedore_storage::{
    BatchResult, BulkDownloader, BulkUploader, ObjectStore, TransferOptions, UploadTask,
};
use stevedore_telemetry::Metrics;
use tracing::info;

use crate::clone::clone_repository;
use crate::error::SyncResult;

/// Outcome of a full deploy run.
#[derive(Debug)]
pub struct DeploymentReport {
    /// Identifier of the new deployment.
    pub id: DeploymentId,
    /// Settled upload batch for the cloned tree.
    pub batch: BatchResult,
}

/// Drives cloning, upload, and reconstruction against one object store.
#[derive(Clone)]
pub struct SyncOrchestrator {
    store: Arc<dyn ObjectStore>,
    options: TransferOptions,
    metrics: Metrics,
}

impl SyncOrchestrator {
    /// Build an orchestrator over `store`, recording transfer counters on
    /// `metrics`.
    #[must_use]
    pub fn new(store: Arc<dyn ObjectStore>, options: TransferOptions, metrics: Metrics) -> Self {
        Self {
            store,
            options,
            metrics,
        }
    }

    /// Clone `repo_url` into a directory named after a fresh deployment
    /// identifier under `workdir`, then upload the cloned tree.
    ///
    /// The cloned checkout is left in place under `workdir` for inspection.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is unsupported, the clone fails, or the
    /// tree cannot be scanned. Per-file upload failures are reported through
    /// the batch result instead.
    pub async fn deploy_repository(
        &self,
        repo_url: &str,
        workdir: &Path,
    ) -> SyncResult<DeploymentReport> {
        let id = DeploymentId::generate();
        let checkout = workdir.join(id.as_str());
        info!(id = %id, url = %repo_url, "starting deployment");

        clone_repository(repo_url, &checkout).await?;
        let batch = self.upload_tree(&checkout, &id).await?;
        Ok(DeploymentReport { id, batch })
    }

    /// Upload every regular file under `root` into the deployment namespace.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be scanned or a file path cannot
    /// be mapped to a key. Per-file upload failures settle into the batch
    /// result.
    pub async fn upload_tree(&self, root: &Path, id: &DeploymentId) -> SyncResult<BatchResult> {
        let files = collect_files(root)?;
        let mut tasks = Vec::with_capacity(files.len());
        for file in files {
            let key = ObjectKey::for_file(&file.path, root, id)?;
            tasks.push(UploadTask {
                key,
                path: file.path,
            });
        }

        let uploader = BulkUploader::new(Arc::clone(&self.store), self.options);
        let batch = uploader.upload_all(tasks).await;
        self.metrics.add_objects_uploaded(batch.succeeded as u64);
        self.metrics
            .add_transfer_failures("upload", batch.failures.len() as u64);
        self.metrics.inc_batch_completed("upload");
        Ok(batch)
    }

    /// Rebuild a deployment's file tree under `output_root`.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be fetched. Per-object download
    /// failures settle into the batch result.
    pub async fn download_deployment(
        &self,
        id: &DeploymentId,
        output_root: &Path,
    ) -> SyncResult<BatchResult> {
        let prefix = format!("{id}/");
        let downloader = BulkDownloader::new(Arc::clone(&self.store), self.options);
        let batch = downloader.download_all(&prefix, output_root).await?;
        self.metrics.add_objects_downloaded(batch.succeeded as u64);
        self.metrics
            .add_transfer_failures("download", batch.failures.len() as u64);
        self.metrics.inc_batch_completed("download");
        Ok(batch)
    }
}
