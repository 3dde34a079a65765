//! Mapping between local file paths and object storage keys.
//!
//! # Design
//! - Keys are always `<deployment-id>/<relative-path>` with forward slashes,
//!   so the mapping is injective per deployment and reversible on download.
//! - `local_target` validates each key segment before touching the
//!   filesystem; a hostile listing must never escape the output root.

use std::path::{Component, Path, PathBuf};

use crate::error::{FsTreeError, FsTreeResult};
use crate::ident::DeploymentId;

/// Storage key for one object within a deployment namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Build the key for a scanned file.
    ///
    /// The key is the deployment identifier followed by the file's path
    /// relative to `scan_root`, joined with forward slashes regardless of the
    /// platform separator.
    ///
    /// # Errors
    ///
    /// Returns [`FsTreeError::NotUnderRoot`] if `local` is not beneath
    /// `scan_root`, and [`FsTreeError::InvalidKey`] if the relative path
    /// contains segments that are not plain names.
    pub fn for_file(local: &Path, scan_root: &Path, id: &DeploymentId) -> FsTreeResult<Self> {
        let relative = local
            .strip_prefix(scan_root)
            .map_err(|_| FsTreeError::NotUnderRoot {
                path: local.to_path_buf(),
                root: scan_root.to_path_buf(),
            })?;

        let mut key = String::from(id.as_str());
        for component in relative.components() {
            let Component::Normal(segment) = component else {
                return Err(FsTreeError::InvalidKey {
                    key: relative.display().to_string(),
                    reason: "relative path must contain only plain segments",
                });
            };
            let Some(segment) = segment.to_str() else {
                return Err(FsTreeError::InvalidKey {
                    key: relative.display().to_string(),
                    reason: "path segment is not valid UTF-8",
                });
            };
            key.push('/');
            key.push_str(segment);
        }
        if key.len() == id.as_str().len() {
            return Err(FsTreeError::InvalidKey {
                key,
                reason: "key must name a file below the deployment root",
            });
        }
        Ok(Self(key))
    }

    /// Parse a key received from an object listing.
    ///
    /// # Errors
    ///
    /// Returns [`FsTreeError::InvalidKey`] if the key is empty, absolute, or
    /// contains empty or dot-dot segments.
    pub fn parse(key: impl Into<String>) -> FsTreeResult<Self> {
        let key = key.into();
        if key.is_empty() {
            return Err(FsTreeError::InvalidKey {
                key,
                reason: "key must not be empty",
            });
        }
        if key.starts_with('/') {
            return Err(FsTreeError::InvalidKey {
                key,
                reason: "key must not be absolute",
            });
        }
        if key.split('/').any(|segment| segment.is_empty()) {
            return Err(FsTreeError::InvalidKey {
                key,
                reason: "key must not contain empty segments",
            });
        }
        if key.split('/').any(|segment| segment == "." || segment == "..") {
            return Err(FsTreeError::InvalidKey {
                key,
                reason: "key must not contain dot segments",
            });
        }
        Ok(Self(key))
    }

    /// Local filesystem path this key reconstructs to under `output_root`.
    ///
    /// Every key segment, including the deployment identifier, becomes one
    /// path component below the output root.
    #[must_use]
    pub fn local_target(&self, output_root: &Path) -> PathBuf {
        let mut target = output_root.to_path_buf();
        for segment in self.0.split('/') {
            target.push(segment);
        }
        target
    }

    /// View the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectKey {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self.0)
    }
}
