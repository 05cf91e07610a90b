//! Running external programs.
//!
//! Every jj invocation goes through a [`CommandRunner`] so the workspace
//! logic can be driven by a scripted runner in tests. Output is buffered to
//! completion; a non-zero exit is data, not an error.

use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

/// Name of the jj executable.
pub const JJ: &str = "jj";

/// Captured result of a finished process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or `-1` when the process was killed by a signal.
    pub exit_code: i32,
}

impl CommandOutput {
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Spawns a program and waits for it.
pub trait CommandRunner {
    /// Run `program` with `args` in `cwd` (or the process directory).
    ///
    /// # Errors
    /// Only when the process cannot be spawned or waited on.
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> io::Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> io::Result<CommandOutput> {
        (**self).run(program, args, cwd)
    }
}

/// Runs real processes via [`std::process::Command`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> io::Result<CommandOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args).stdin(Stdio::null());
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        debug!(program, ?args, cwd = ?cwd, "spawning");
        let output = cmd.output()?;
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }
}

/// Typed jj subcommands on top of a [`CommandRunner`].
pub struct Jj<'r, R: CommandRunner + ?Sized> {
    runner: &'r R,
}

impl<'r, R: CommandRunner + ?Sized> Jj<'r, R> {
    pub const fn new(runner: &'r R) -> Self {
        Self { runner }
    }

    fn run(&self, args: &[&str], cwd: &Path) -> io::Result<CommandOutput> {
        self.runner.run(JJ, args, Some(cwd))
    }

    /// `jj workspace add --name <name> [--revision <rev>] <path>`
    ///
    /// # Errors
    /// Spawn failure only.
    pub fn workspace_add(
        &self,
        name: &str,
        revision: Option<&str>,
        path: &Path,
        cwd: &Path,
    ) -> io::Result<CommandOutput> {
        let path = path.to_string_lossy();
        let mut args = vec!["workspace", "add", "--name", name];
        if let Some(rev) = revision {
            args.extend(["--revision", rev]);
        }
        args.push(&*path);
        self.run(&args, cwd)
    }

    /// `jj workspace forget <name>`
    ///
    /// # Errors
    /// Spawn failure only.
    pub fn workspace_forget(&self, name: &str, cwd: &Path) -> io::Result<CommandOutput> {
        self.run(&["workspace", "forget", name], cwd)
    }

    /// `jj workspace rename <new_name>`, renaming the workspace at `cwd`.
    ///
    /// # Errors
    /// Spawn failure only.
    pub fn workspace_rename(&self, new_name: &str, cwd: &Path) -> io::Result<CommandOutput> {
        self.run(&["workspace", "rename", new_name], cwd)
    }

    /// `jj workspace list`
    ///
    /// # Errors
    /// Spawn failure only.
    pub fn workspace_list(&self, cwd: &Path) -> io::Result<CommandOutput> {
        self.run(&["workspace", "list"], cwd)
    }

    /// `jj edit <revision>` in the workspace at `cwd`.
    ///
    /// # Errors
    /// Spawn failure only.
    pub fn edit(&self, revision: &str, cwd: &Path) -> io::Result<CommandOutput> {
        self.run(&["edit", revision], cwd)
    }
}

/// Error indicating the child process exited with a non-zero status.
/// Carries the exit code for the caller to propagate.
#[derive(Debug)]
pub struct ExitCodeError(pub i32);

impl std::fmt::Display for ExitCodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "command exited with code {}", self.0)
    }
}

impl std::error::Error for ExitCodeError {}

/// Run a command with inherited stdio and return its exit code.
///
/// # Errors
/// Spawn failure only.
pub fn run_attached(program: &str, args: &[String], cwd: &Path) -> io::Result<i32> {
    let status = Command::new(program).args(args).current_dir(cwd).status()?;
    Ok(status.code().unwrap_or(-1))
}
