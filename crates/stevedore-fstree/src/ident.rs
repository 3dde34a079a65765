//! Deployment identifiers.
//!
//! # Design
//! - One identifier per synchronization run, generated once and never
//!   reused; it becomes the root prefix of every object key in the run.
//! - Keep the alphabet to lowercase alphanumerics so the identifier is
//!   always a single, unambiguous key segment.

use std::fmt;

use rand::Rng;
use rand::distr::Alphanumeric;

use crate::error::{FsTreeError, FsTreeResult};

const ID_LENGTH: usize = 12;

/// Opaque token naming one synchronization run's object-storage namespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeploymentId(String);

impl DeploymentId {
    /// Generate a fresh identifier for a new deployment run.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let value: String = std::iter::repeat_with(|| {
            (rng.sample(Alphanumeric) as char).to_ascii_lowercase()
        })
        .take(ID_LENGTH)
        .collect();
        Self(value)
    }

    /// Parse an identifier received from a caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is empty or contains characters outside
    /// `[a-z0-9]`.
    pub fn parse(value: impl Into<String>) -> FsTreeResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(FsTreeError::InvalidId {
                value,
                reason: "must not be empty",
            });
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(FsTreeError::InvalidId {
                value,
                reason: "must contain only lowercase alphanumerics",
            });
        }
        Ok(Self(value))
    }

    /// View the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
