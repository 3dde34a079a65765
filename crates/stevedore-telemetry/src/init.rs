//! Tracing subscriber installation and logging configuration.
//!
//! # Design
//! - Centralise logging setup (fmt or JSON) with a single entry point.
//! - Respect `RUST_LOG` when present, falling back to the configured level.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default logging directive when neither `RUST_LOG` nor configuration
/// provides one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Log level directive (e.g. `info`, `debug`, `stevedore_sync=trace`).
    pub level: &'a str,
    /// Output format selection for the tracing subscriber.
    pub format: LogFormat,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Emit logs as structured JSON objects.
    Json,
    /// Emit human-readable, pretty-printed logs.
    Pretty,
}

impl LogFormat {
    /// Choose a sensible default for the current build.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Configure and install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the tracing subscriber cannot be installed (for
/// example, because another subscriber has already been set globally).
pub fn init_logging(config: &LoggingConfig<'_>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_err| EnvFilter::try_new(config.level))
        .context("invalid log level directive")?;

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_target(true))
            .try_init()
            .context("failed to install JSON tracing subscriber")?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .try_init()
            .context("failed to install tracing subscriber")?,
    }

    info!(level = config.level, format = ?config.format, "logging initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_info_level() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn install_claims_the_global_subscriber_once() {
        let config = LoggingConfig::default();
        // Whichever call wins the global slot, a second install must fail.
        let _ = init_logging(&config);
        assert!(init_logging(&config).is_err());
    }

    #[test]
    fn infer_picks_pretty_for_debug_builds() {
        let format = LogFormat::infer();
        if cfg!(debug_assertions) {
            assert_eq!(format, LogFormat::Pretty);
        } else {
            assert_eq!(format, LogFormat::Json);
        }
    }
}
