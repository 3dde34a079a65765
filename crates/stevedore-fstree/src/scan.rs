//! Recursive discovery of regular files under a scan root.
//!
//! # Design
//! - Lazy iteration so callers can stream large trees without buffering.
//! - Deterministic ordering via lexicographic directory entries, which keeps
//!   batch logs and tests stable across runs.
//! - Symbolic links are not followed and never appear in the result set.

use std::io;
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::{FsTreeError, FsTreeResult};

/// One regular file discovered under a scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileEntry {
    /// Absolute (or root-relative) path of the file on disk.
    pub path: PathBuf,
    /// File size in bytes at scan time.
    pub size: u64,
}

/// Lazy iterator over the regular files beneath a scan root.
pub struct TreeScan {
    root: PathBuf,
    walker: walkdir::IntoIter,
}

impl TreeScan {
    /// Root directory this scan traverses.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Iterator for TreeScan {
    type Item = FsTreeResult<LocalFileEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(error) => return Some(Err(map_walk_error(&self.root, error))),
            };
            if !entry.file_type().is_file() {
                continue;
            }
            return Some(entry_metadata(&self.root, &entry));
        }
    }
}

/// Start a lazy scan of the regular files under `root`.
///
/// # Errors
///
/// Returns [`FsTreeError::RootNotFound`] if `root` does not exist or is not a
/// directory.
pub fn scan(root: impl Into<PathBuf>) -> FsTreeResult<TreeScan> {
    let root = root.into();
    if !root.is_dir() {
        return Err(FsTreeError::RootNotFound { path: root });
    }
    let walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter();
    Ok(TreeScan { root, walker })
}

/// Scan `root` and collect every regular file into a vector.
///
/// # Errors
///
/// Returns the first traversal error encountered; a partial file list is
/// never produced.
pub fn collect_files(root: impl Into<PathBuf>) -> FsTreeResult<Vec<LocalFileEntry>> {
    scan(root)?.collect()
}

fn entry_metadata(root: &Path, entry: &DirEntry) -> FsTreeResult<LocalFileEntry> {
    let metadata = entry
        .metadata()
        .map_err(|error| map_walk_error(root, error))?;
    Ok(LocalFileEntry {
        path: entry.path().to_path_buf(),
        size: metadata.len(),
    })
}

fn map_walk_error(root: &Path, error: walkdir::Error) -> FsTreeError {
    let path = error
        .path()
        .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
    let denied = error
        .io_error()
        .is_some_and(|io| io.kind() == io::ErrorKind::PermissionDenied);
    if denied {
        if let Some(source) = error.into_io_error() {
            return FsTreeError::Permission { path, source };
        }
        return FsTreeError::Permission {
            path,
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
    }
    FsTreeError::walk(path, error)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn touch(root: &Path, relative: &str, contents: &[u8]) -> io::Result<PathBuf> {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    #[test]
    fn scan_finds_every_regular_file_at_any_depth() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        touch(dir.path(), "a.txt", b"alpha")?;
        touch(dir.path(), "sub/b.txt", b"beta")?;
        touch(dir.path(), "sub/deep/nested/c.bin", &[0u8; 64])?;
        fs::create_dir_all(dir.path().join("empty-dir"))?;

        let files = collect_files(dir.path())?;
        let mut relative: Vec<_> = files
            .iter()
            .map(|entry| {
                entry
                    .path
                    .strip_prefix(dir.path())
                    .map(Path::to_path_buf)
                    .map_err(anyhow::Error::from)
            })
            .collect::<Result<_, _>>()?;
        relative.sort();

        assert_eq!(
            relative,
            vec![
                PathBuf::from("a.txt"),
                PathBuf::from("sub/b.txt"),
                PathBuf::from("sub/deep/nested/c.bin"),
            ]
        );
        Ok(())
    }

    #[test]
    fn scan_reports_sizes_including_empty_files() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        touch(dir.path(), "empty.txt", b"")?;
        touch(dir.path(), "five.txt", b"12345")?;

        let files = collect_files(dir.path())?;
        let mut sizes: Vec<u64> = files.iter().map(|entry| entry.size).collect();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![0, 5]);
        Ok(())
    }

    #[test]
    fn scan_of_empty_tree_yields_no_entries() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        assert!(collect_files(dir.path())?.is_empty());
        Ok(())
    }

    #[test]
    fn scan_rejects_missing_root() {
        let result = scan("/definitely/not/a/real/root");
        assert!(matches!(result, Err(FsTreeError::RootNotFound { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn scan_skips_symbolic_links() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let target = touch(dir.path(), "real.txt", b"payload")?;
        std::os::unix::fs::symlink(&target, dir.path().join("link.txt"))?;
        std::os::unix::fs::symlink(dir.path().join("sub"), dir.path().join("loop"))?;

        let files = collect_files(dir.path())?;
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, target);
        Ok(())
    }

    #[test]
    fn scan_order_is_deterministic() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        touch(dir.path(), "b.txt", b"b")?;
        touch(dir.path(), "a.txt", b"a")?;
        touch(dir.path(), "sub/z.txt", b"z")?;

        let first: Vec<_> = collect_files(dir.path())?
            .into_iter()
            .map(|entry| entry.path)
            .collect();
        let second: Vec<_> = collect_files(dir.path())?
            .into_iter()
            .map(|entry| entry.path)
            .collect();
        assert_eq!(first, second);
        Ok(())
    }
}
