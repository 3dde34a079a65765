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

//! Repository synchronization pipeline.
//!
//! Ties the lower layers together: clone a repository, scan its tree, push
//! every file into object storage under a fresh deployment identifier, and
//! reconstruct the tree later from the bucket.
//!
//! Layout: `clone.rs` (git clone wrapper), `orchestrator.rs` (the pipeline),
//! `error.rs`.

pub mod clone;
pub mod error;
pub mod orchestrator;

pub use clone::{clone_repository, validate_repo_url};
pub use error::{SyncError, SyncResult};
pub use orchestrator::{DeploymentReport, SyncOrchestrator};
