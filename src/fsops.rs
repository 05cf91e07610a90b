//! Filesystem helpers for workspace setup and teardown.

use std::fs;
use std::io;
use std::path::{Component, Path};

use anyhow::{Context, Result};
use tracing::warn;

/// What happened to one copy request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Copied {
    File,
    Dir,
    /// Source did not exist; nothing was copied.
    Skipped,
}

/// Copy `src` to `dest`, recursively for directories.
///
/// A missing `src` is expected (copy lists name optional files): it is
/// logged and reported as [`Copied::Skipped`]. Parent directories of
/// `dest` are created as needed.
///
/// # Errors
/// Any I/O failure once the source is known to exist.
pub fn copy_path_into(src: &Path, dest: &Path) -> Result<Copied> {
    let meta = match fs::metadata(src) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!(src = %src.display(), "copy source does not exist, skipping");
            return Ok(Copied::Skipped);
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to stat {}", src.display()));
        }
    };

    if let Some(parent) = dest.parent() {
        ensure_dir(parent)?;
    }

    if meta.is_dir() {
        copy_dir(src, dest)
            .with_context(|| format!("Failed to copy {} to {}", src.display(), dest.display()))?;
        Ok(Copied::Dir)
    } else {
        fs::copy(src, dest)
            .with_context(|| format!("Failed to copy {} to {}", src.display(), dest.display()))?;
        Ok(Copied::File)
    }
}

fn copy_dir(src: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let from = entry.path();
        let to = dest.join(entry.file_name());
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            copy_dir(&from, &to)?;
        } else if file_type.is_symlink() {
            copy_symlink(&from, &to)?;
        } else {
            fs::copy(&from, &to)?;
        }
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    let target = fs::read_link(from)?;
    match fs::remove_file(to) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }
    std::os::unix::fs::symlink(target, to)
}

#[cfg(not(unix))]
fn copy_symlink(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to).map(|_| ())
}

/// True if `entry` is a relative path that stays below whatever it is joined to.
///
/// Rejects absolute paths, `..` and prefixes; `.` segments are allowed.
#[must_use]
pub fn is_contained(entry: &Path) -> bool {
    let mut normal = false;
    for component in entry.components() {
        match component {
            Component::Normal(_) => normal = true,
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    normal
}

/// Recursively delete `path`. Absent paths are a no-op.
///
/// # Errors
/// Any I/O failure other than the path being absent.
pub fn remove_tree(path: &Path) -> Result<()> {
    match fs::symlink_metadata(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to stat {}", path.display())),
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path)
            .with_context(|| format!("Failed to remove {}", path.display())),
        Ok(_) => {
            fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))
        }
    }
}

/// Create `path` and its parents if missing.
///
/// # Errors
/// Any I/O failure from `create_dir_all`.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).with_context(|| format!("Failed to create {}", path.display()))
}

/// Move a directory to a new location on the same filesystem.
///
/// # Errors
/// Any I/O failure from `rename`.
pub fn move_dir(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        ensure_dir(parent)?;
    }
    fs::rename(from, to)
        .with_context(|| format!("Failed to move {} to {}", from.display(), to.display()))
}
