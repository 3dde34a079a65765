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

//! Environment-backed configuration for the stevedore services.
//!
//! Layout: `model.rs` (typed settings sections), `loader.rs` (environment
//! resolution), `error.rs` (validation errors).

pub mod error;
pub mod loader;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use loader::load_settings;
pub use model::{HttpSettings, Settings, StorageSettings, TransferSettings};
