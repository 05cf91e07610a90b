//! Workspace lifecycle: create, list, go, remove, rename, copy, clean,
//! init, and syncing the default workspace's revision.
//!
//! Every operation starts from an explicit directory (`cwd`) rather than the
//! process's current directory, re-reads the configuration, and talks to jj
//! only through the [`CommandRunner`] it was built with.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{instrument, warn};

use crate::config::{self, Config};
use crate::error::WorkspaceError;
use crate::exec::{self, CommandOutput, CommandRunner, ExitCodeError, Jj, SystemRunner};
use crate::fsops::{self, Copied};
use crate::layout::container_dir_for;
use crate::names::{self, normalize};
use crate::repo::resolve_default_root;

mod create;
mod list;
mod remove;
mod rename;
mod sync;

pub use create::{Created, FailedCommand};
pub use list::{ListedWorkspace, render_text};
pub use remove::{CleanOutcome, Removed};
pub use sync::Switched;

/// A workspace name resolved against the current repository and config.
#[derive(Clone, Debug)]
pub struct Resolved {
    pub config: Config,
    pub default_root: PathBuf,
    /// Normalized name.
    pub name: String,
    pub path: PathBuf,
}

/// Result of copying one configured entry into a workspace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CopyReport {
    /// The entry as written in the config.
    pub entry: String,
    pub outcome: Copied,
}

impl CopyReport {
    #[must_use]
    pub fn skipped(&self) -> bool {
        self.outcome == Copied::Skipped
    }
}

/// Entry point for all workspace operations.
pub struct WorkspaceManager<R: CommandRunner = SystemRunner> {
    cwd: PathBuf,
    runner: R,
}

impl WorkspaceManager<SystemRunner> {
    /// Manager running real `jj` processes from `cwd`.
    pub fn system(cwd: impl Into<PathBuf>) -> Self {
        Self::new(cwd, SystemRunner)
    }
}

impl<R: CommandRunner> WorkspaceManager<R> {
    pub fn new(cwd: impl Into<PathBuf>, runner: R) -> Self {
        Self {
            cwd: cwd.into(),
            runner,
        }
    }

    /// Directory every resolution starts from.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    const fn jj(&self) -> Jj<'_, R> {
        Jj::new(&self.runner)
    }

    /// Normalize `name` and place it in the configured container directory.
    ///
    /// # Errors
    /// [`WorkspaceError::Validation`] for an empty name; repository
    /// resolution failures otherwise.
    pub fn resolve(&self, name: &str) -> Result<Resolved> {
        let name = validated_name(name)?;
        let default_root = resolve_default_root(&self.cwd)?;
        let config = Config::load_for(&default_root);
        let path = container_dir_for(&default_root, config.suffix())?.join(&name);
        Ok(Resolved {
            config,
            default_root,
            name,
            path,
        })
    }

    /// Raw `jj workspace list` output, run from the default workspace.
    fn workspace_list(&self, default_root: &Path) -> Result<String> {
        let out = self
            .jj()
            .workspace_list(default_root)
            .context("Failed to run jj workspace list")?;
        check(&out, "list workspaces")?;
        Ok(out.stdout)
    }

    /// Copy every configured entry from the default workspace into `dest`.
    ///
    /// Missing sources and entries that are absolute or climb out with `..`
    /// are skipped; other copy failures propagate.
    fn copy_files(config: &Config, default_root: &Path, dest: &Path) -> Result<Vec<CopyReport>> {
        let mut reports = Vec::with_capacity(config.copy_files.len());
        for entry in &config.copy_files {
            let outcome = if fsops::is_contained(Path::new(entry)) {
                fsops::copy_path_into(&default_root.join(entry), &dest.join(entry))?
            } else {
                warn!(%entry, "copy entry must be relative to the repository root, skipping");
                Copied::Skipped
            };
            reports.push(CopyReport {
                entry: entry.clone(),
                outcome,
            });
        }
        Ok(reports)
    }

    /// Path of workspace `name`; `default` resolves to the default workspace.
    ///
    /// # Errors
    /// [`WorkspaceError::NotFound`] if the workspace directory is absent.
    #[instrument(skip(self), fields(workspace = name))]
    pub fn go(&self, name: &str) -> Result<PathBuf> {
        if names::is_default(name) {
            return resolve_default_root(&self.cwd);
        }
        let ws = self.resolve(name)?;
        if !ws.path.exists() {
            return Err(WorkspaceError::NotFound { name: ws.name }.into());
        }
        Ok(ws.path)
    }

    /// Re-run the configured file copies into an existing workspace.
    ///
    /// # Errors
    /// [`WorkspaceError::NotFound`] if the workspace directory is absent.
    #[instrument(skip(self), fields(workspace = name))]
    pub fn copy_to(&self, name: &str) -> Result<Vec<CopyReport>> {
        let ws = self.resolve(name)?;
        if !ws.path.exists() {
            return Err(WorkspaceError::NotFound { name: ws.name }.into());
        }
        Self::copy_files(&ws.config, &ws.default_root, &ws.path)
    }

    /// Write a default configuration document in the default workspace.
    ///
    /// # Errors
    /// [`WorkspaceError::NotARepository`] outside a repository,
    /// [`WorkspaceError::ConfigAlreadyExists`] if one is present.
    #[instrument(skip(self))]
    pub fn init(&self) -> Result<PathBuf> {
        let default_root = resolve_default_root(&self.cwd)?;
        config::init_config(&default_root)
    }

    /// Run `cmd` inside workspace `name` with the terminal attached.
    ///
    /// # Errors
    /// [`WorkspaceError::NotFound`] for a missing workspace, [`ExitCodeError`]
    /// when the command exits non-zero.
    #[instrument(skip(self, cmd), fields(workspace = name))]
    pub fn exec(&self, name: &str, cmd: &[String]) -> Result<()> {
        let Some((program, args)) = cmd.split_first() else {
            return Err(WorkspaceError::validation(
                "no command specified\n  Usage: jjws exec <workspace> -- <command> [args...]",
            )
            .into());
        };
        let path = self.go(name)?;
        let code = exec::run_attached(program, args, &path)
            .with_context(|| format!("Failed to run '{program}'"))?;
        if code != 0 {
            return Err(ExitCodeError(code).into());
        }
        Ok(())
    }
}

/// Normalize a user-supplied name, rejecting empty ones.
fn validated_name(name: &str) -> Result<String> {
    let name = normalize(name);
    if name.trim().is_empty() {
        return Err(WorkspaceError::validation("workspace name cannot be empty").into());
    }
    Ok(name)
}

/// Turn a non-zero jj exit into [`WorkspaceError::ExternalTool`].
fn check(out: &CommandOutput, operation: &str) -> Result<()> {
    if out.success() {
        Ok(())
    } else {
        Err(WorkspaceError::external(operation, &out.stderr).into())
    }
}
