//! Wires configuration, telemetry, storage, and the HTTP surface together.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use stevedore_api::{ApiServer, ApiState};
use stevedore_config::load_settings;
use stevedore_storage::{S3ObjectStore, TransferOptions};
use stevedore_sync::SyncOrchestrator;
use stevedore_telemetry::{LoggingConfig, Metrics, init_logging};
use tracing::info;

/// Load configuration and run the service until it is stopped.
///
/// # Errors
///
/// Returns an error if configuration is invalid, telemetry cannot be
/// initialized, the working directories cannot be created, or the HTTP
/// server fails to bind.
pub async fn run() -> Result<()> {
    let settings = load_settings().context("load configuration")?;
    init_logging(&LoggingConfig {
        level: &settings.log_level,
        ..LoggingConfig::default()
    })
    .context("initialize logging")?;
    let telemetry = Metrics::new().context("register metrics")?;

    tokio::fs::create_dir_all(&settings.transfer.workdir)
        .await
        .with_context(|| format!("create workdir {}", settings.transfer.workdir.display()))?;
    tokio::fs::create_dir_all(&settings.transfer.output_root)
        .await
        .with_context(|| {
            format!(
                "create output root {}",
                settings.transfer.output_root.display()
            )
        })?;

    let aws = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .load()
        .await;
    let client = aws_sdk_s3::Client::new(&aws);
    let store = Arc::new(S3ObjectStore::new(client, settings.storage.bucket.clone()));
    info!(bucket = %settings.storage.bucket, "object store ready");

    let sync = SyncOrchestrator::new(
        store,
        TransferOptions::new(settings.transfer.max_concurrent),
        telemetry.clone(),
    );
    let state = ApiState::new(sync, settings.transfer.workdir.clone(), telemetry);

    let addr = SocketAddr::new(settings.http.bind_addr, settings.http.port);
    ApiServer::new(Arc::new(state)).serve(addr).await
}
