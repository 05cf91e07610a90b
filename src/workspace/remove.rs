use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use super::WorkspaceManager;
use crate::config::Config;
use crate::error::WorkspaceError;
use crate::exec::CommandRunner;
use crate::fsops;
use crate::layout::container_dir_for;
use crate::listing::parse_listing;
use crate::names::{self, DEFAULT_WORKSPACE};
use crate::repo::resolve_default_root;

/// A removed workspace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Removed {
    pub name: String,
    pub path: PathBuf,
    /// jj accepted the forget. False means it was already untracked or jj
    /// refused; the directory is removed either way.
    pub forgotten: bool,
    /// A directory was present and deleted.
    pub deleted_dir: bool,
}

/// Result of `clean`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CleanOutcome {
    /// Every tracked workspace still has its directory.
    NothingToDo,
    Forgot {
        forgotten: Vec<String>,
        /// Names whose forget failed; left tracked.
        failed: Vec<String>,
    },
}

impl<R: CommandRunner> WorkspaceManager<R> {
    /// Forget workspace `name` in jj and delete its directory.
    ///
    /// # Errors
    /// [`WorkspaceError::CannotRemoveDefault`] for the default workspace,
    /// before anything else is touched.
    #[instrument(skip(self), fields(workspace = name))]
    pub fn remove(&self, name: &str) -> Result<Removed> {
        if names::is_default(name) {
            return Err(WorkspaceError::CannotRemoveDefault.into());
        }
        let ws = self.resolve(name)?;

        let out = self
            .jj()
            .workspace_forget(&ws.name, &ws.default_root)
            .context("Failed to run jj workspace forget")?;
        if !out.success() {
            warn!(
                workspace = %ws.name,
                stderr = out.stderr.trim(),
                "jj workspace forget failed, removing directory anyway"
            );
        }

        let deleted_dir = ws.path.exists();
        if deleted_dir {
            fsops::remove_tree(&ws.path)?;
        }
        info!(path = %ws.path.display(), "workspace removed");

        Ok(Removed {
            name: ws.name,
            path: ws.path,
            forgotten: out.success(),
            deleted_dir,
        })
    }

    /// Forget every tracked workspace whose directory is gone.
    ///
    /// # Errors
    /// [`WorkspaceError::ExternalTool`] if the listing fails. Individual
    /// forget failures are reported in [`CleanOutcome::Forgot`].
    #[instrument(skip(self))]
    pub fn clean(&self) -> Result<CleanOutcome> {
        let default_root = resolve_default_root(&self.cwd)?;
        let config = Config::load_for(&default_root);
        let container = container_dir_for(&default_root, config.suffix())?;
        let listing = self.workspace_list(&default_root)?;

        let stale: Vec<String> = parse_listing(&listing)
            .into_iter()
            .filter(|e| e.name != DEFAULT_WORKSPACE)
            .filter(|e| !container.join(&e.name).exists())
            .map(|e| e.name)
            .collect();
        if stale.is_empty() {
            return Ok(CleanOutcome::NothingToDo);
        }

        let mut forgotten = Vec::new();
        let mut failed = Vec::new();
        for name in stale {
            let out = self
                .jj()
                .workspace_forget(&name, &default_root)
                .context("Failed to run jj workspace forget")?;
            if out.success() {
                info!(workspace = %name, "forgot stale workspace");
                forgotten.push(name);
            } else {
                warn!(workspace = %name, stderr = out.stderr.trim(), "failed to forget workspace");
                failed.push(name);
            }
        }
        Ok(CleanOutcome::Forgot { forgotten, failed })
    }
}
