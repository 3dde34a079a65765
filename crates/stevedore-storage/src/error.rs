//! Error types for object storage and bulk transfer.
//!
//! # Design
//! - Constant error messages; context lives in structured fields.
//! - Backend SDK errors are flattened to their rendered message so callers
//!   never depend on SDK error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors produced by object stores and transfer engines.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The requested object does not exist in the bucket.
    #[error("object not found")]
    ObjectMissing {
        /// Key that was requested.
        key: String,
    },
    /// A backend call failed for one object.
    #[error("storage backend call failed")]
    Backend {
        /// Backend operation that failed.
        operation: &'static str,
        /// Key the operation targeted.
        key: String,
        /// Rendered backend error.
        message: String,
    },
    /// A listing page could not be fetched.
    ///
    /// Listing failures abort the whole batch because an incomplete listing
    /// would silently drop objects.
    #[error("object listing failed")]
    Listing {
        /// Prefix being listed.
        prefix: String,
        /// Rendered backend error.
        message: String,
    },
    /// A local filesystem operation failed during transfer.
    #[error("local file operation failed")]
    Io {
        /// Operation that failed.
        operation: &'static str,
        /// Local path involved.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A listed key could not be mapped to a local path.
    #[error("listed key rejected")]
    Key {
        /// Underlying key validation error.
        source: stevedore_fstree::FsTreeError,
    },
}

impl StorageError {
    pub(crate) fn backend(
        operation: &'static str,
        key: impl Into<String>,
        error: &impl std::fmt::Display,
    ) -> Self {
        Self::Backend {
            operation,
            key: key.into(),
            message: error.to_string(),
        }
    }

    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}
