//! Pointing the default workspace at another workspace's change.

use anyhow::{Context, Result};
use tracing::{info, instrument};

use super::{WorkspaceManager, check, validated_name};
use crate::error::WorkspaceError;
use crate::exec::CommandRunner;
use crate::listing::extract_revision_id;
use crate::names;
use crate::repo::locate;

/// The default workspace now edits `revision`, taken from `workspace`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Switched {
    pub workspace: String,
    pub revision: String,
}

impl<R: CommandRunner> WorkspaceManager<R> {
    /// Make the default workspace edit the current workspace's change.
    ///
    /// # Errors
    /// [`WorkspaceError::Validation`] when run from the default workspace or
    /// when jj does not list the current workspace,
    /// [`WorkspaceError::ExternalTool`] if `jj edit` fails.
    #[instrument(skip(self))]
    pub fn this(&self) -> Result<Switched> {
        let here = locate(&self.cwd)?;
        if here.is_default() {
            return Err(WorkspaceError::validation(
                "already in the default workspace; nothing to sync\n  \
                 Run this from inside a named workspace.",
            )
            .into());
        }
        let default_root = here.default_root()?;
        let name = here
            .root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .with_context(|| format!("workspace root has no name: {}", here.root.display()))?;

        let listing = self.workspace_list(&default_root)?;
        let Some(revision) = extract_revision_id(&listing, &name) else {
            return Err(WorkspaceError::validation(format!(
                "workspace '{name}' is not in jj's workspace list\n  \
                 Check: jjws list"
            ))
            .into());
        };

        let out = self
            .jj()
            .edit(&revision, &default_root)
            .context("Failed to run jj edit")?;
        check(&out, "switch default workspace")?;
        info!(workspace = %name, %revision, "default workspace now editing");
        Ok(Switched {
            workspace: name,
            revision,
        })
    }

    /// From the default workspace, edit the change workspace `name` is on.
    ///
    /// # Errors
    /// [`WorkspaceError::Validation`] for an empty or default name,
    /// [`WorkspaceError::NotDefaultWorkspace`] outside the default workspace,
    /// [`WorkspaceError::NotFound`] if jj does not list `name`,
    /// [`WorkspaceError::ExternalTool`] if `jj edit` fails.
    #[instrument(skip(self), fields(workspace = name))]
    pub fn use_workspace(&self, name: &str) -> Result<Switched> {
        let name = validated_name(name)?;
        if names::is_default(&name) {
            return Err(WorkspaceError::validation(
                "cannot use the default workspace onto itself",
            )
            .into());
        }
        let here = locate(&self.cwd)?;
        if !here.is_default() {
            return Err(WorkspaceError::NotDefaultWorkspace { root: here.root }.into());
        }
        let default_root = here.root;

        let listing = self.workspace_list(&default_root)?;
        let Some(revision) = extract_revision_id(&listing, &name) else {
            return Err(WorkspaceError::NotFound { name }.into());
        };

        let out = self
            .jj()
            .edit(&revision, &default_root)
            .context("Failed to run jj edit")?;
        check(&out, "switch default workspace")?;
        info!(workspace = %name, %revision, "default workspace now editing");
        Ok(Switched {
            workspace: name,
            revision,
        })
    }
}
