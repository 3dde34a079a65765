//! End-to-end upload and reconstruction against the in-memory store.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use stevedore_fstree::DeploymentId;
use stevedore_storage::{MemoryObjectStore, TransferOptions};
use stevedore_sync::SyncOrchestrator;
use stevedore_telemetry::Metrics;
use tempfile::TempDir;

fn write_file(root: &Path, relative: &str, contents: &[u8]) -> anyhow::Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

fn orchestrator(store: Arc<MemoryObjectStore>) -> anyhow::Result<SyncOrchestrator> {
    Ok(SyncOrchestrator::new(
        store,
        TransferOptions::default(),
        Metrics::new()?,
    ))
}

#[tokio::test]
async fn uploaded_tree_reconstructs_byte_for_byte() -> anyhow::Result<()> {
    let source = TempDir::new()?;
    let output = TempDir::new()?;
    write_file(source.path(), "a.txt", b"alpha")?;
    write_file(source.path(), "sub/b.txt", b"beta")?;
    write_file(source.path(), "sub/deep/c.bin", &[7u8; 512])?;

    let store = Arc::new(MemoryObjectStore::new());
    let sync = orchestrator(store)?;
    let id = DeploymentId::parse("xyz123")?;

    let upload = sync.upload_tree(source.path(), &id).await?;
    assert!(upload.is_complete());
    assert_eq!(upload.succeeded, 3);

    let download = sync.download_deployment(&id, output.path()).await?;
    assert!(download.is_complete());
    assert_eq!(download.succeeded, 3);

    let rebuilt = output.path().join("xyz123");
    assert_eq!(fs::read(rebuilt.join("a.txt"))?, b"alpha");
    assert_eq!(fs::read(rebuilt.join("sub/b.txt"))?, b"beta");
    assert_eq!(fs::read(rebuilt.join("sub/deep/c.bin"))?, vec![7u8; 512]);
    Ok(())
}

#[tokio::test]
async fn empty_files_survive_the_round_trip() -> anyhow::Result<()> {
    let source = TempDir::new()?;
    let output = TempDir::new()?;
    write_file(source.path(), "empty.txt", b"")?;

    let store = Arc::new(MemoryObjectStore::new());
    let sync = orchestrator(store)?;
    let id = DeploymentId::parse("dep42")?;

    sync.upload_tree(source.path(), &id).await?;
    sync.download_deployment(&id, output.path()).await?;

    let rebuilt = output.path().join("dep42/empty.txt");
    assert!(rebuilt.is_file());
    assert_eq!(fs::metadata(rebuilt)?.len(), 0);
    Ok(())
}

#[tokio::test]
async fn duplicate_contents_keep_distinct_paths() -> anyhow::Result<()> {
    let source = TempDir::new()?;
    let output = TempDir::new()?;
    write_file(source.path(), "one.txt", b"same bytes")?;
    write_file(source.path(), "nested/two.txt", b"same bytes")?;

    let store = Arc::new(MemoryObjectStore::new());
    let sync = orchestrator(Arc::clone(&store))?;
    let id = DeploymentId::parse("dup777")?;

    let upload = sync.upload_tree(source.path(), &id).await?;
    assert_eq!(upload.succeeded, 2);
    assert_eq!(store.len(), 2);

    sync.download_deployment(&id, output.path()).await?;
    assert_eq!(fs::read(output.path().join("dup777/one.txt"))?, b"same bytes");
    assert_eq!(fs::read(output.path().join("dup777/nested/two.txt"))?, b"same bytes");
    Ok(())
}

#[tokio::test]
async fn deployments_do_not_leak_into_each_other() -> anyhow::Result<()> {
    let first_src = TempDir::new()?;
    let second_src = TempDir::new()?;
    let output = TempDir::new()?;
    write_file(first_src.path(), "only-first.txt", b"first")?;
    write_file(second_src.path(), "only-second.txt", b"second")?;

    let store = Arc::new(MemoryObjectStore::new());
    let sync = orchestrator(store)?;
    let first = DeploymentId::parse("aaa111")?;
    let second = DeploymentId::parse("bbb222")?;

    sync.upload_tree(first_src.path(), &first).await?;
    sync.upload_tree(second_src.path(), &second).await?;

    let batch = sync.download_deployment(&first, output.path()).await?;
    assert_eq!(batch.succeeded, 1);
    assert!(output.path().join("aaa111/only-first.txt").is_file());
    assert!(!output.path().join("bbb222").exists());
    Ok(())
}

#[tokio::test]
async fn repeated_download_overwrites_in_place() -> anyhow::Result<()> {
    let source = TempDir::new()?;
    let output = TempDir::new()?;
    write_file(source.path(), "a.txt", b"alpha")?;
    write_file(source.path(), "sub/b.txt", b"beta")?;

    let store = Arc::new(MemoryObjectStore::new());
    let sync = orchestrator(store)?;
    let id = DeploymentId::parse("twice1")?;
    sync.upload_tree(source.path(), &id).await?;

    let first = sync.download_deployment(&id, output.path()).await?;
    // Tamper with one reconstructed file so the second pass must overwrite.
    fs::write(output.path().join("twice1/a.txt"), b"stale")?;
    let second = sync.download_deployment(&id, output.path()).await?;

    assert_eq!(first.succeeded, 2);
    assert_eq!(second.succeeded, 2);
    assert!(second.is_complete());
    assert_eq!(fs::read(output.path().join("twice1/a.txt"))?, b"alpha");
    assert_eq!(fs::read(output.path().join("twice1/sub/b.txt"))?, b"beta");
    // No duplicate or renamed entries appear under the deployment root.
    assert_eq!(fs::read_dir(output.path().join("twice1"))?.count(), 2);
    Ok(())
}

#[tokio::test]
async fn transfer_counters_track_both_directions() -> anyhow::Result<()> {
    let source = TempDir::new()?;
    let output = TempDir::new()?;
    write_file(source.path(), "a.txt", b"alpha")?;
    write_file(source.path(), "b.txt", b"beta")?;

    let store = Arc::new(MemoryObjectStore::new());
    let metrics = Metrics::new()?;
    let sync = SyncOrchestrator::new(store, TransferOptions::default(), metrics.clone());
    let id = DeploymentId::parse("count9")?;

    sync.upload_tree(source.path(), &id).await?;
    sync.download_deployment(&id, output.path()).await?;

    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.objects_uploaded_total, 2);
    assert_eq!(snapshot.objects_downloaded_total, 2);
    Ok(())
}

#[tokio::test]
async fn empty_source_tree_uploads_nothing() -> anyhow::Result<()> {
    let source = TempDir::new()?;
    let store = Arc::new(MemoryObjectStore::new());
    let sync = orchestrator(Arc::clone(&store))?;
    let id = DeploymentId::parse("void00")?;

    let batch = sync.upload_tree(source.path(), &id).await?;
    assert!(batch.is_complete());
    assert_eq!(batch.succeeded, 0);
    assert!(store.is_empty());
    Ok(())
}
