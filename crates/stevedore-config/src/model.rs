//! Typed settings consumed by the stevedore services.
//!
//! # Design
//! - Group settings by the component that consumes them.
//! - Keep storage credentials out of the model: endpoint, region, and
//!   credentials are resolved by the storage SDK's provider chain at
//!   bootstrap and treated as opaque here.

use std::net::IpAddr;
use std::path::PathBuf;

/// Object-storage settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    /// Bucket that receives every deployment snapshot.
    pub bucket: String,
}

/// Settings governing bulk transfer batches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferSettings {
    /// Directory that holds cloned repositories awaiting upload.
    pub workdir: PathBuf,
    /// Root directory that downloaded deployments are reconstructed under.
    pub output_root: PathBuf,
    /// Maximum number of in-flight transfers per batch.
    pub max_concurrent: usize,
}

/// HTTP listener settings for the trigger endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    /// Address the listener binds to.
    pub bind_addr: IpAddr,
    /// Port the listener binds to.
    pub port: u16,
}

/// Complete application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Object-storage settings.
    pub storage: StorageSettings,
    /// Transfer batch settings.
    pub transfer: TransferSettings,
    /// HTTP listener settings.
    pub http: HttpSettings,
    /// Log level directive applied when `RUST_LOG` is unset.
    pub log_level: String,
}
