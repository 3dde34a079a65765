//! Error types for tree scanning and key mapping.
//!
//! # Design
//! - Constant error messages; context lives in structured fields.
//! - `NotUnderRoot` marks a broken caller contract, never user input.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for file tree operations.
pub type FsTreeResult<T> = Result<T, FsTreeError>;

/// Errors produced by tree scanning and key mapping.
#[derive(Debug, Error)]
pub enum FsTreeError {
    /// The scan root does not exist or is not a directory.
    #[error("scan root not found")]
    RootNotFound {
        /// Root path that was requested.
        path: PathBuf,
    },
    /// A directory could not be read during traversal.
    #[error("directory not readable")]
    Permission {
        /// Path that could not be read.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// Directory traversal failed for a reason other than permissions.
    #[error("tree traversal failed")]
    Walk {
        /// Root path of the failing traversal.
        path: PathBuf,
        /// Underlying walkdir error.
        source: walkdir::Error,
    },
    /// A file handed to the key mapper was outside the scan root.
    ///
    /// This indicates a caller bug and is always fatal.
    #[error("file is not under the scan root")]
    NotUnderRoot {
        /// File path that violated the contract.
        path: PathBuf,
        /// Scan root the path was expected under.
        root: PathBuf,
    },
    /// An object key contained segments that cannot map to a local path.
    #[error("invalid object key")]
    InvalidKey {
        /// Offending key.
        key: String,
        /// Static reason for the rejection.
        reason: &'static str,
    },
    /// A deployment identifier failed validation.
    #[error("invalid deployment identifier")]
    InvalidId {
        /// Offending identifier payload.
        value: String,
        /// Static reason for the rejection.
        reason: &'static str,
    },
}

impl FsTreeError {
    pub(crate) fn walk(path: impl Into<PathBuf>, source: walkdir::Error) -> Self {
        Self::Walk {
            path: path.into(),
            source,
        }
    }
}
