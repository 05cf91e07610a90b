//! Repository discovery.
//!
//! A jj workspace root is a directory holding a `.jj/` marker. Inside it,
//! `.jj/repo` tells the default workspace apart from the others:
//!
//! ```text
//! my-repo/.jj/repo                        directory: the backing store
//! my-repo-workspaces/feature/.jj/repo     file: path to my-repo/.jj/repo
//! ```
//!
//! Resolution never shells out to jj; it only reads the filesystem, so it
//! works even when the jj binary is missing.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::error::WorkspaceError;

/// Marker directory present at every workspace root.
pub const MARKER: &str = ".jj";

/// Entry inside [`MARKER`] that points at (or is) the repository store.
pub const STORE_ENTRY: &str = "repo";

/// What the store entry of a located workspace looks like.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkerKind {
    /// `.jj/repo` is a directory: this root is the default workspace.
    Default,
    /// `.jj/repo` is a file naming the default workspace's store.
    Linked {
        /// Trimmed file content, as written by jj.
        pointer: PathBuf,
    },
}

/// A located workspace root and the kind of marker found there.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RepoLocation {
    /// Absolute path of the workspace containing the marker.
    pub root: PathBuf,
    pub marker: MarkerKind,
}

impl RepoLocation {
    /// True when `root` is itself the default workspace.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self.marker, MarkerKind::Default)
    }

    /// Root of the default workspace this location belongs to.
    ///
    /// # Errors
    /// Fails if a linked pointer has fewer than two path segments.
    pub fn default_root(&self) -> Result<PathBuf> {
        match &self.marker {
            MarkerKind::Default => Ok(self.root.clone()),
            MarkerKind::Linked { pointer } => {
                let store = if pointer.is_absolute() {
                    pointer.clone()
                } else {
                    self.root.join(MARKER).join(pointer)
                };
                let Some(default_root) = store.parent().and_then(Path::parent) else {
                    bail!(
                        "malformed store pointer in {}: {}",
                        self.root.join(MARKER).join(STORE_ENTRY).display(),
                        pointer.display()
                    );
                };
                Ok(absolute_path(default_root))
            }
        }
    }
}

/// Canonical form of `path` when it exists, otherwise its absolute form.
pub fn absolute_path(path: &Path) -> PathBuf {
    fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Find the nearest ancestor of `start` (inclusive) holding a `.jj` marker.
///
/// The filesystem root itself is never considered.
///
/// # Errors
/// Returns [`WorkspaceError::NotARepository`] when no ancestor matches.
pub fn locate_root(start: &Path) -> Result<PathBuf> {
    let start = absolute_path(start);
    for dir in start.ancestors() {
        if dir.parent().is_none() {
            break;
        }
        if dir.join(MARKER).exists() {
            return Ok(dir.to_path_buf());
        }
    }
    Err(WorkspaceError::NotARepository { start }.into())
}

/// Classify the store entry of the workspace at `root`.
///
/// # Errors
/// Fails with an I/O error when `.jj/repo` is missing, unreadable, or
/// neither a directory nor a regular file.
pub fn inspect_marker(root: &Path) -> Result<MarkerKind> {
    let store = root.join(MARKER).join(STORE_ENTRY);
    let meta = fs::metadata(&store)
        .with_context(|| format!("repository store missing at {}", store.display()))?;

    if meta.is_dir() {
        return Ok(MarkerKind::Default);
    }
    if meta.is_file() {
        let content = fs::read_to_string(&store)
            .with_context(|| format!("Failed to read {}", store.display()))?;
        return Ok(MarkerKind::Linked {
            pointer: PathBuf::from(content.trim()),
        });
    }
    bail!(
        "unexpected file type for repository store at {}",
        store.display()
    )
}

/// Locate the workspace containing `start` and classify its marker.
///
/// # Errors
/// See [`locate_root`] and [`inspect_marker`].
pub fn locate(start: &Path) -> Result<RepoLocation> {
    let root = locate_root(start)?;
    let marker = inspect_marker(&root)?;
    Ok(RepoLocation { root, marker })
}

/// Root of the default workspace for the repository containing `start`.
///
/// # Errors
/// See [`locate`] and [`RepoLocation::default_root`].
pub fn resolve_default_root(start: &Path) -> Result<PathBuf> {
    locate(start)?.default_root()
}
