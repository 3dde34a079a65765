//! Environment resolution for [`Settings`].
//!
//! # Design
//! - Read everything through an injectable lookup so tests never mutate
//!   process environment.
//! - Only the bucket is required; every other field has a default.
//! - Validate eagerly with field-level errors instead of failing later in
//!   the component that consumes the value.

use std::net::IpAddr;
use std::path::PathBuf;

use crate::error::{ConfigError, ConfigResult};
use crate::model::{HttpSettings, Settings, StorageSettings, TransferSettings};

const ENV_BUCKET: &str = "STEVEDORE_BUCKET";
const ENV_WORKDIR: &str = "STEVEDORE_WORKDIR";
const ENV_OUTPUT_ROOT: &str = "STEVEDORE_OUTPUT_ROOT";
const ENV_BIND_ADDR: &str = "STEVEDORE_BIND_ADDR";
const ENV_HTTP_PORT: &str = "STEVEDORE_HTTP_PORT";
const ENV_MAX_CONCURRENT: &str = "STEVEDORE_MAX_CONCURRENT_TRANSFERS";
const ENV_LOG_LEVEL: &str = "STEVEDORE_LOG_LEVEL";

const DEFAULT_WORKDIR: &str = "workdir";
const DEFAULT_OUTPUT_ROOT: &str = "output";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1";
const DEFAULT_HTTP_PORT: u16 = 3000;
const DEFAULT_MAX_CONCURRENT: usize = 16;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Load [`Settings`] from the process environment.
///
/// # Errors
///
/// Returns an error if the bucket variable is absent or any provided value
/// fails validation.
pub fn load_settings() -> ConfigResult<Settings> {
    settings_from_lookup(|name| std::env::var(name).ok())
}

/// Build [`Settings`] from an arbitrary variable lookup.
///
/// # Errors
///
/// Returns an error if the bucket variable is absent or any provided value
/// fails validation.
pub fn settings_from_lookup<F>(lookup: F) -> ConfigResult<Settings>
where
    F: Fn(&str) -> Option<String>,
{
    let bucket = lookup(ENV_BUCKET).ok_or(ConfigError::MissingVariable { name: ENV_BUCKET })?;
    if bucket.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            section: "storage",
            field: "bucket",
            value: Some(bucket),
            reason: "must not be empty",
        });
    }

    let workdir = non_empty_path(
        lookup(ENV_WORKDIR).unwrap_or_else(|| DEFAULT_WORKDIR.to_string()),
        "workdir",
    )?;
    let output_root = non_empty_path(
        lookup(ENV_OUTPUT_ROOT).unwrap_or_else(|| DEFAULT_OUTPUT_ROOT.to_string()),
        "output_root",
    )?;

    let bind_addr = parse_bind_addr(
        &lookup(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
    )?;
    let port = match lookup(ENV_HTTP_PORT) {
        Some(raw) => parse_port(&raw)?,
        None => DEFAULT_HTTP_PORT,
    };

    let max_concurrent = match lookup(ENV_MAX_CONCURRENT) {
        Some(raw) => parse_max_concurrent(&raw)?,
        None => DEFAULT_MAX_CONCURRENT,
    };

    let log_level = lookup(ENV_LOG_LEVEL).unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    Ok(Settings {
        storage: StorageSettings { bucket },
        transfer: TransferSettings {
            workdir,
            output_root,
            max_concurrent,
        },
        http: HttpSettings { bind_addr, port },
        log_level,
    })
}

fn non_empty_path(raw: String, field: &'static str) -> ConfigResult<PathBuf> {
    if raw.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            section: "transfer",
            field,
            value: Some(raw),
            reason: "must not be empty",
        });
    }
    Ok(PathBuf::from(raw))
}

fn parse_bind_addr(raw: &str) -> ConfigResult<IpAddr> {
    raw.parse::<IpAddr>()
        .map_err(|_err| ConfigError::InvalidField {
            section: "http",
            field: "bind_addr",
            value: Some(raw.to_string()),
            reason: "must be a valid IP address",
        })
}

fn parse_port(raw: &str) -> ConfigResult<u16> {
    let port = raw
        .parse::<u16>()
        .map_err(|_err| ConfigError::InvalidField {
            section: "http",
            field: "port",
            value: Some(raw.to_string()),
            reason: "must be an integer between 1 and 65535",
        })?;
    if port == 0 {
        return Err(ConfigError::InvalidField {
            section: "http",
            field: "port",
            value: Some(raw.to_string()),
            reason: "must not be zero",
        });
    }
    Ok(port)
}

fn parse_max_concurrent(raw: &str) -> ConfigResult<usize> {
    let limit = raw
        .parse::<usize>()
        .map_err(|_err| ConfigError::InvalidField {
            section: "transfer",
            field: "max_concurrent",
            value: Some(raw.to_string()),
            reason: "must be a positive integer",
        })?;
    if limit == 0 {
        return Err(ConfigError::InvalidField {
            section: "transfer",
            field: "max_concurrent",
            value: Some(raw.to_string()),
            reason: "must be at least 1",
        });
    }
    Ok(limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |name| map.get(name).map(ToString::to_string)
    }

    #[test]
    fn defaults_apply_when_only_bucket_is_set() -> ConfigResult<()> {
        let settings = settings_from_lookup(lookup_from(&[(ENV_BUCKET, "deployments")]))?;
        assert_eq!(settings.storage.bucket, "deployments");
        assert_eq!(settings.transfer.workdir, PathBuf::from(DEFAULT_WORKDIR));
        assert_eq!(
            settings.transfer.output_root,
            PathBuf::from(DEFAULT_OUTPUT_ROOT)
        );
        assert_eq!(settings.transfer.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(settings.http.port, DEFAULT_HTTP_PORT);
        assert_eq!(settings.log_level, DEFAULT_LOG_LEVEL);
        Ok(())
    }

    #[test]
    fn missing_bucket_is_rejected() {
        let result = settings_from_lookup(lookup_from(&[]));
        assert!(matches!(
            result,
            Err(ConfigError::MissingVariable { name }) if name == ENV_BUCKET
        ));
    }

    #[test]
    fn explicit_values_override_defaults() -> ConfigResult<()> {
        let settings = settings_from_lookup(lookup_from(&[
            (ENV_BUCKET, "deployments"),
            (ENV_WORKDIR, "/var/lib/stevedore/work"),
            (ENV_OUTPUT_ROOT, "/var/lib/stevedore/out"),
            (ENV_BIND_ADDR, "0.0.0.0"),
            (ENV_HTTP_PORT, "8088"),
            (ENV_MAX_CONCURRENT, "4"),
            (ENV_LOG_LEVEL, "debug"),
        ]))?;
        assert_eq!(
            settings.transfer.workdir,
            PathBuf::from("/var/lib/stevedore/work")
        );
        assert_eq!(settings.http.bind_addr, IpAddr::from([0, 0, 0, 0]));
        assert_eq!(settings.http.port, 8088);
        assert_eq!(settings.transfer.max_concurrent, 4);
        assert_eq!(settings.log_level, "debug");
        Ok(())
    }

    #[test]
    fn invalid_port_and_concurrency_are_rejected() {
        let zero_port = settings_from_lookup(lookup_from(&[
            (ENV_BUCKET, "deployments"),
            (ENV_HTTP_PORT, "0"),
        ]));
        assert!(matches!(
            zero_port,
            Err(ConfigError::InvalidField { field: "port", .. })
        ));

        let zero_limit = settings_from_lookup(lookup_from(&[
            (ENV_BUCKET, "deployments"),
            (ENV_MAX_CONCURRENT, "0"),
        ]));
        assert!(matches!(
            zero_limit,
            Err(ConfigError::InvalidField {
                field: "max_concurrent",
                ..
            })
        ));
    }

    #[test]
    fn invalid_bind_addr_is_rejected() {
        let result = settings_from_lookup(lookup_from(&[
            (ENV_BUCKET, "deployments"),
            (ENV_BIND_ADDR, "not-an-ip"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidField {
                field: "bind_addr",
                ..
            })
        ));
    }
}
