//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulate collector registration to keep the public API small.
//! - Expose only the counters relevant to the synchronization pipeline.

use anyhow::{Context, Result};
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use serde::Serialize;

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: std::sync::Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    objects_uploaded_total: IntCounter,
    objects_downloaded_total: IntCounter,
    transfer_failures_total: IntCounterVec,
    batches_completed_total: IntCounterVec,
}

/// Snapshot of the transfer counters for health reporting.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Total objects uploaded across all batches.
    pub objects_uploaded_total: u64,
    /// Total objects downloaded across all batches.
    pub objects_downloaded_total: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests received"),
            &["route", "code"],
        )?;
        let objects_uploaded_total = IntCounter::with_opts(Opts::new(
            "objects_uploaded_total",
            "Objects uploaded to the deployment bucket",
        ))?;
        let objects_downloaded_total = IntCounter::with_opts(Opts::new(
            "objects_downloaded_total",
            "Objects downloaded from the deployment bucket",
        ))?;
        let transfer_failures_total = IntCounterVec::new(
            Opts::new(
                "transfer_failures_total",
                "Per-object transfer failures by direction",
            ),
            &["direction"],
        )?;
        let batches_completed_total = IntCounterVec::new(
            Opts::new(
                "batches_completed_total",
                "Settled transfer batches by direction",
            ),
            &["direction"],
        )?;

        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(objects_uploaded_total.clone()))?;
        registry.register(Box::new(objects_downloaded_total.clone()))?;
        registry.register(Box::new(transfer_failures_total.clone()))?;
        registry.register(Box::new(batches_completed_total.clone()))?;

        Ok(Self {
            inner: std::sync::Arc::new(MetricsInner {
                registry,
                http_requests_total,
                objects_uploaded_total,
                objects_downloaded_total,
                transfer_failures_total,
                batches_completed_total,
            }),
        })
    }

    /// Increment the HTTP request counter for the given route and status code.
    pub fn inc_http_request(&self, route: &str, status: u16) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string()])
            .inc();
    }

    /// Record uploaded objects from a settled batch.
    pub fn add_objects_uploaded(&self, count: u64) {
        self.inner.objects_uploaded_total.inc_by(count);
    }

    /// Record downloaded objects from a settled batch.
    pub fn add_objects_downloaded(&self, count: u64) {
        self.inner.objects_downloaded_total.inc_by(count);
    }

    /// Record per-object transfer failures for the given direction.
    pub fn add_transfer_failures(&self, direction: &str, count: u64) {
        self.inner
            .transfer_failures_total
            .with_label_values(&[direction])
            .inc_by(count);
    }

    /// Increment the settled batch counter for the given direction.
    pub fn inc_batch_completed(&self, direction: &str) {
        self.inner
            .batches_completed_total
            .with_label_values(&[direction])
            .inc();
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded or if the encoded
    /// buffer is not valid UTF-8.
    pub fn render(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.inner.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .context("failed to encode Prometheus metrics")?;
        String::from_utf8(buffer).context("metrics output was not valid UTF-8")
    }

    /// Take a point-in-time snapshot of the transfer counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            objects_uploaded_total: self.inner.objects_uploaded_total.get(),
            objects_downloaded_total: self.inner.objects_downloaded_total.get(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_snapshot_reflects_updates() -> Result<()> {
        let metrics = Metrics::new()?;
        metrics.inc_http_request("/deploy", 200);
        metrics.add_objects_uploaded(9);
        metrics.add_objects_downloaded(4);
        metrics.add_transfer_failures("upload", 1);
        metrics.inc_batch_completed("upload");

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.objects_uploaded_total, 9);
        assert_eq!(snapshot.objects_downloaded_total, 4);

        let rendered = metrics.render()?;
        assert!(rendered.contains("objects_uploaded_total"));
        assert!(rendered.contains("transfer_failures_total"));
        Ok(())
    }
}
