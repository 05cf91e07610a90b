//! On-disk layout of named workspaces.
//!
//! Named workspaces live in a container directory next to the default
//! workspace:
//!
//! ```text
//! src/my-repo/                       default workspace
//! src/my-repo-workspaces/feature-x/  workspace "feature-x"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::names::normalize;
use crate::repo::resolve_default_root;

/// Suffix appended to the repository name when none is configured.
pub const DEFAULT_SUFFIX: &str = "-workspaces";

/// Name of the container directory for `repo_name`.
///
/// `None` means "not configured" and falls back to [`DEFAULT_SUFFIX`].
/// `Some("")` is a real override: workspaces sit directly beside the
/// default workspace's parent-relative name.
#[must_use]
pub fn container_dir_name(repo_name: &str, suffix: Option<&str>) -> String {
    format!("{repo_name}{}", suffix.unwrap_or(DEFAULT_SUFFIX))
}

/// Container directory for a repository whose default workspace is `default_root`.
///
/// # Errors
/// Fails if `default_root` has no final component or parent.
pub fn container_dir_for(default_root: &Path, suffix: Option<&str>) -> Result<PathBuf> {
    let (Some(parent), Some(name)) = (default_root.parent(), default_root.file_name()) else {
        bail!(
            "cannot place workspaces next to {}",
            default_root.display()
        );
    };
    let repo_name = name.to_string_lossy();
    Ok(parent.join(container_dir_name(&repo_name, suffix)))
}

/// Container directory for the repository containing `start`.
///
/// # Errors
/// Propagates repository resolution failures.
pub fn container_dir(start: &Path, suffix: Option<&str>) -> Result<PathBuf> {
    container_dir_for(&resolve_default_root(start)?, suffix)
}

/// Path of workspace `name` for the repository containing `start`.
///
/// # Errors
/// Propagates repository resolution failures.
pub fn workspace_path(start: &Path, name: &str, suffix: Option<&str>) -> Result<PathBuf> {
    Ok(container_dir(start, suffix)?.join(normalize(name)))
}
