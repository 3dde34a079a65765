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

//! Object storage backends and bulk transfer engines.
//!
//! Layout: `client.rs` (the [`ObjectStore`] seam), `s3.rs` (AWS S3 backend),
//! `memory.rs` (in-memory backend for tests), `transfer.rs` (keyed bulk
//! upload and download), `error.rs`.

pub mod client;
pub mod error;
pub mod memory;
pub mod s3;
pub mod transfer;

pub use client::{ObjectPage, ObjectStore};
pub use error::{StorageError, StorageResult};
pub use memory::MemoryObjectStore;
pub use s3::S3ObjectStore;
pub use transfer::{BatchResult, BulkDownloader, BulkUploader, TransferFailure, TransferOptions, UploadTask};
