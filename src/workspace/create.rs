use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use super::{CopyReport, WorkspaceManager, check};
use crate::error::WorkspaceError;
use crate::exec::CommandRunner;
use crate::fsops;
use crate::names;

/// A freshly created workspace.
#[derive(Clone, Debug)]
pub struct Created {
    pub name: String,
    pub path: PathBuf,
    pub copied: Vec<CopyReport>,
    /// Post-create commands that did not succeed, in run order.
    pub failed_commands: Vec<FailedCommand>,
}

/// A post-create command that exited non-zero or could not be started.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedCommand {
    pub command: String,
    /// `None` when the program could not be spawned at all.
    pub exit_code: Option<i32>,
    pub stderr: String,
}

impl<R: CommandRunner> WorkspaceManager<R> {
    /// Create workspace `name` next to the default workspace.
    ///
    /// The existence check runs before jj is touched. Once jj has added the
    /// workspace, configured files are copied in and post-create commands
    /// run in order; a failing command is recorded and the rest still run.
    ///
    /// # Errors
    /// [`WorkspaceError::AlreadyExists`] if the target directory is present,
    /// [`WorkspaceError::ExternalTool`] if `jj workspace add` fails.
    #[instrument(skip(self), fields(workspace = name))]
    pub fn create(&self, name: &str, revision: Option<&str>) -> Result<Created> {
        let ws = self.resolve(name)?;
        if names::is_default(&ws.name) {
            return Err(WorkspaceError::validation(format!(
                "'{}' is reserved for the default workspace",
                names::DEFAULT_WORKSPACE
            ))
            .into());
        }
        if ws.path.exists() {
            return Err(WorkspaceError::AlreadyExists {
                name: ws.name,
                path: ws.path,
            }
            .into());
        }

        if let Some(container) = ws.path.parent() {
            fsops::ensure_dir(container)?;
        }

        let out = self
            .jj()
            .workspace_add(&ws.name, revision, &ws.path, &ws.default_root)
            .context("Failed to run jj workspace add")?;
        check(&out, "create workspace")?;
        info!(path = %ws.path.display(), "workspace added");

        let copied = Self::copy_files(&ws.config, &ws.default_root, &ws.path)?;
        let failed_commands = self.run_post_create(&ws.config.post_create_commands, &ws.path);

        Ok(Created {
            name: ws.name,
            path: ws.path,
            copied,
            failed_commands,
        })
    }

    /// Run each command in `dir`, sequentially. Failures are logged and kept.
    fn run_post_create(&self, commands: &[String], dir: &Path) -> Vec<FailedCommand> {
        let mut failed = Vec::new();
        for command in commands {
            let mut parts = command.split_whitespace();
            let Some(program) = parts.next() else {
                continue;
            };
            let args: Vec<&str> = parts.collect();
            info!(%command, "running post-create command");

            match self.runner.run(program, &args, Some(dir)) {
                Ok(out) if out.success() => {}
                Ok(out) => {
                    warn!(
                        %command,
                        exit_code = out.exit_code,
                        stderr = out.stderr.trim(),
                        "post-create command failed"
                    );
                    failed.push(FailedCommand {
                        command: command.clone(),
                        exit_code: Some(out.exit_code),
                        stderr: out.stderr.trim().to_owned(),
                    });
                }
                Err(e) => {
                    warn!(%command, error = %e, "post-create command could not be started");
                    failed.push(FailedCommand {
                        command: command.clone(),
                        exit_code: None,
                        stderr: e.to_string(),
                    });
                }
            }
        }
        failed
    }
}
