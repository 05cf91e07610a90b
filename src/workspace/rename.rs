use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use super::{WorkspaceManager, check};
use crate::error::WorkspaceError;
use crate::exec::CommandRunner;
use crate::fsops;
use crate::names;

impl<R: CommandRunner> WorkspaceManager<R> {
    /// Rename workspace `old` to `new` in jj, then move its directory.
    ///
    /// jj renames the workspace it is run from, so the rename runs inside
    /// the old directory before the move.
    ///
    /// # Errors
    /// [`WorkspaceError::NotFound`] if `old` has no directory,
    /// [`WorkspaceError::AlreadyExists`] if `new` does,
    /// [`WorkspaceError::ExternalTool`] if jj refuses.
    #[instrument(skip(self))]
    pub fn rename(&self, old: &str, new: &str) -> Result<PathBuf> {
        if names::is_default(old) {
            return Err(WorkspaceError::CannotRemoveDefault.into());
        }
        if names::is_default(new) {
            return Err(WorkspaceError::validation(format!(
                "cannot rename a workspace to '{}'",
                names::DEFAULT_WORKSPACE
            ))
            .into());
        }
        let from = self.resolve(old)?;
        let to = self.resolve(new)?;

        if !from.path.exists() {
            return Err(WorkspaceError::NotFound { name: from.name }.into());
        }
        if to.path.exists() {
            return Err(WorkspaceError::AlreadyExists {
                name: to.name,
                path: to.path,
            }
            .into());
        }

        let out = self
            .jj()
            .workspace_rename(&to.name, &from.path)
            .context("Failed to run jj workspace rename")?;
        check(&out, "rename workspace")?;

        fsops::move_dir(&from.path, &to.path)?;
        info!(from = %from.name, to = %to.name, "workspace renamed");
        Ok(to.path)
    }
}
