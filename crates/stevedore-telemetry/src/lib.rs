#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Logging and metrics primitives shared across the stevedore services.
//!
//! Layout: `init.rs` (tracing subscriber installation), `metrics.rs`
//! (prometheus registry and snapshot).

pub mod init;
pub mod metrics;

pub use init::{DEFAULT_LOG_LEVEL, LogFormat, LoggingConfig, init_logging};
pub use metrics::{Metrics, MetricsSnapshot};
