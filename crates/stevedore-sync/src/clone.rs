//! Shallow git clone into a deployment working directory.
//!
//! # Design
//! - Depth-1 clones; the pipeline only ever needs the current tree.
//! - URL validation happens before anything touches the network, so a bad
//!   request never costs a subprocess.

use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::info;

use crate::error::{SyncError, SyncResult};

const SUPPORTED_SCHEMES: [&str; 3] = ["http://", "https://", "git://"];

// Keep error payloads bounded even when git dumps a full transcript.
const MAX_STDERR_BYTES: usize = 2048;

/// Check that a repository URL uses a supported scheme.
///
/// # Errors
///
/// Returns [`SyncError::UnsupportedUrl`] if the URL is empty or does not use
/// an http, https, or git scheme.
pub fn validate_repo_url(url: &str) -> SyncResult<()> {
    if url.trim().is_empty() {
        return Err(SyncError::UnsupportedUrl {
            url: url.to_owned(),
            reason: "url must not be empty",
        });
    }
    if !SUPPORTED_SCHEMES
        .iter()
        .any(|scheme| url.starts_with(scheme))
    {
        return Err(SyncError::UnsupportedUrl {
            url: url.to_owned(),
            reason: "scheme must be http, https, or git",
        });
    }
    Ok(())
}

/// Clone `url` into `dest` at depth 1.
///
/// # Errors
///
/// Returns an error if the URL is unsupported, the `git` binary cannot be
/// spawned, or the clone exits unsuccessfully.
pub async fn clone_repository(url: &str, dest: &Path) -> SyncResult<()> {
    validate_repo_url(url)?;

    let output = Command::new("git")
        .arg("clone")
        .arg("--depth")
        .arg("1")
        .arg(url)
        .arg(dest)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| SyncError::GitSpawn { source })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let mut start = stderr.len().saturating_sub(MAX_STDERR_BYTES);
        while !stderr.is_char_boundary(start) {
            start += 1;
        }
        let tail = stderr[start..].to_string();
        return Err(SyncError::CloneFailed {
            url: url.to_owned(),
            code: output.status.code(),
            stderr: tail,
        });
    }

    info!(%url, dest = %dest.display(), "repository cloned");
    Ok(())
}
