//! Router construction and server host.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::http::handlers::{deploy, healthz, metrics};
use crate::state::ApiState;

/// Axum router wrapper that hosts the deployment API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Build the router around shared handler state.
    #[must_use]
    pub fn new(state: Arc<ApiState>) -> Self {
        let router = Router::new()
            .route("/deploy", post(deploy))
            .route("/healthz", get(healthz))
            .route("/metrics", get(metrics))
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
            .with_state(state);
        Self { router }
    }

    /// Router for direct use in tests.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Bind `addr` and serve until the process is stopped.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or the server exits
    /// abnormally.
    pub async fn serve(self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("bind {addr}"))?;
        info!(%addr, "api listening");
        axum::serve(listener, self.router)
            .await
            .context("api server exited")?;
        Ok(())
    }
}
