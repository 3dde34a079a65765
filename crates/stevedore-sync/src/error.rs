//! Error types for the synchronization pipeline.

use std::io;

use thiserror::Error;

/// Result type for synchronization operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors produced by the synchronization pipeline.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The repository URL was rejected before any clone was attempted.
    #[error("unsupported repository url")]
    UnsupportedUrl {
        /// URL that was rejected.
        url: String,
        /// Static reason for the rejection.
        reason: &'static str,
    },
    /// The `git` binary could not be spawned.
    #[error("failed to spawn git")]
    GitSpawn {
        /// Underlying IO error.
        source: io::Error,
    },
    /// The clone ran but exited unsuccessfully.
    #[error("git clone failed")]
    CloneFailed {
        /// URL that failed to clone.
        url: String,
        /// Exit code, if the process exited normally.
        code: Option<i32>,
        /// Trailing stderr output from git.
        stderr: String,
    },
    /// Scanning or key mapping failed.
    #[error(transparent)]
    Tree(#[from] stevedore_fstree::FsTreeError),
    /// A storage operation failed.
    #[error(transparent)]
    Storage(#[from] stevedore_storage::StorageError),
}
