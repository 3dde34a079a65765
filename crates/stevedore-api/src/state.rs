//! Shared state handed to every HTTP handler.

use std::path::PathBuf;

use stevedore_sync::SyncOrchestrator;
use stevedore_telemetry::Metrics;

/// Dependencies shared by the HTTP handlers.
pub struct ApiState {
    /// Pipeline driving clone, upload, and reconstruction.
    pub sync: SyncOrchestrator,
    /// Directory repositories are cloned into, one subdirectory per deploy.
    pub workdir: PathBuf,
    /// Metrics registry backing the health and metrics endpoints.
    pub telemetry: Metrics,
}

impl ApiState {
    /// Bundle the handler dependencies.
    #[must_use]
    pub const fn new(sync: SyncOrchestrator, workdir: PathBuf, telemetry: Metrics) -> Self {
        Self {
            sync,
            workdir,
            telemetry,
        }
    }
}
