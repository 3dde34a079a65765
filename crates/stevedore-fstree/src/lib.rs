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

//! Local file tree primitives for deployment snapshots.
//!
//! Layout: `ident.rs` (deployment identifiers), `scan.rs` (recursive file
//! discovery), `key.rs` (object key mapping), `error.rs`.

pub mod error;
pub mod ident;
pub mod key;
pub mod scan;

pub use error::{FsTreeError, FsTreeResult};
pub use ident::DeploymentId;
pub use key::ObjectKey;
pub use scan::{LocalFileEntry, TreeScan, collect_files, scan};
