//! Workspace error types.
//!
//! Defines [`WorkspaceError`], the classified failures a workspace operation
//! can report. Each message says what went wrong and, where there is one,
//! the command that fixes it.
//!
//! Operations return `anyhow::Result`; a classified failure travels as a
//! `WorkspaceError` inside the `anyhow::Error` so the binary can tell it
//! apart from unexpected I/O failures with `downcast_ref`.

use std::fmt;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// WorkspaceError
// ---------------------------------------------------------------------------

/// Classified failure of a workspace operation.
#[derive(Debug)]
pub enum WorkspaceError {
    /// No ancestor of the starting directory contains a `.jj` marker.
    NotARepository {
        /// Directory the search started from.
        start: PathBuf,
    },

    /// The target workspace directory is already present.
    AlreadyExists {
        /// Normalized workspace name.
        name: String,
        /// The occupied path.
        path: PathBuf,
    },

    /// The workspace directory or listing entry is absent.
    NotFound {
        /// Normalized workspace name.
        name: String,
    },

    /// Attempt to remove or rename the default workspace.
    CannotRemoveDefault,

    /// An operation that must run from the default workspace was run elsewhere.
    NotDefaultWorkspace {
        /// The workspace root the caller is in.
        root: PathBuf,
    },

    /// `jj` exited non-zero for an operation whose failure is fatal.
    ExternalTool {
        /// Short description of what was attempted (e.g. `"create workspace"`).
        operation: String,
        /// Captured stderr from jj.
        stderr: String,
    },

    /// A required argument is missing or a precondition does not hold.
    Validation {
        /// Human-readable reason.
        message: String,
    },

    /// `init` found an existing configuration document.
    ConfigAlreadyExists {
        /// Path of the existing document.
        path: PathBuf,
    },
}

impl WorkspaceError {
    /// Shorthand for a [`WorkspaceError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`WorkspaceError::ExternalTool`].
    pub fn external(operation: impl Into<String>, stderr: &str) -> Self {
        Self::ExternalTool {
            operation: operation.into(),
            stderr: stderr.trim().to_owned(),
        }
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for WorkspaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotARepository { start } => {
                write!(
                    f,
                    "not a jj repository (or any parent up to the filesystem root): {}\n  To fix: run from inside a jj workspace, or pass -C <dir>",
                    start.display()
                )
            }
            Self::AlreadyExists { name, path } => {
                write!(
                    f,
                    "workspace '{name}' already exists at {}\n  To fix: pick another name, or remove it first:\n    jjws remove {name}",
                    path.display()
                )
            }
            Self::NotFound { name } => {
                write!(
                    f,
                    "workspace '{name}' not found\n  To fix: check available workspaces:\n    jjws list"
                )
            }
            Self::CannotRemoveDefault => {
                write!(f, "the default workspace cannot be removed or renamed")
            }
            Self::NotDefaultWorkspace { root } => {
                write!(
                    f,
                    "this command must be run from the default workspace (current: {})\n  To fix: jjws go default",
                    root.display()
                )
            }
            Self::ExternalTool { operation, stderr } => {
                write!(f, "failed to {operation}")?;
                if !stderr.is_empty() {
                    write!(f, "\n  jj: {stderr}")?;
                }
                Ok(())
            }
            Self::Validation { message } => write!(f, "{message}"),
            Self::ConfigAlreadyExists { path } => {
                write!(f, "config already exists at {}", path.display())
            }
        }
    }
}

impl std::error::Error for WorkspaceError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
