//! Project configuration (`.jjws.json`).
//!
//! Lives directly in the default workspace root. Every field is optional:
//!
//! ```json
//! {
//!   "copyFiles": [".env", "secrets/"],
//!   "postCreateCommands": ["npm install"],
//!   "workspacesDirSuffix": ".ws"
//! }
//! ```
//!
//! A missing or unparsable file yields the defaults. The configuration is
//! read fresh by every operation.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::error::WorkspaceError;

/// Config file name, relative to the default workspace root.
pub const CONFIG_FILE: &str = ".jjws.json";

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Per-repository workspace setup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Paths relative to the default workspace, copied into new workspaces.
    #[serde(default)]
    pub copy_files: Vec<String>,

    /// Commands run, in order, inside a freshly created workspace.
    /// Split on whitespace; no shell is involved.
    #[serde(default)]
    pub post_create_commands: Vec<String>,

    /// Container directory suffix. An empty string in the file counts as unset.
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub workspaces_dir_suffix: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

/// Error parsing a configuration document.
#[derive(Debug)]
pub struct ConfigError {
    /// The path that was being loaded (if available).
    pub path: Option<PathBuf>,
    /// Human-readable message with line-level detail when possible.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(p) = &self.path {
            write!(f, "{}: {}", p.display(), self.message)
        } else {
            write!(f, "config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Parse a JSON document.
    ///
    /// # Errors
    /// Returns [`ConfigError`] with the line and column of invalid JSON.
    pub fn parse(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError {
            path: None,
            message: format!("line {} column {}: {e}", e.line(), e.column()),
        })
    }

    /// Load the configuration at `path`, falling back to defaults.
    ///
    /// Missing file → defaults, silently. Unreadable or invalid file →
    /// defaults, with a warning naming the problem.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config, using defaults");
                return Self::default();
            }
        };
        match Self::parse(&contents) {
            Ok(cfg) => cfg,
            Err(mut e) => {
                e.path = Some(path.to_owned());
                warn!("invalid config, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Load the configuration of the repository whose default workspace is `default_root`.
    #[must_use]
    pub fn load_for(default_root: &Path) -> Self {
        Self::load(&config_path(default_root))
    }

    /// Configured container suffix, if any.
    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        self.workspaces_dir_suffix.as_deref()
    }
}

/// Location of the config document for a default workspace root.
#[must_use]
pub fn config_path(default_root: &Path) -> PathBuf {
    default_root.join(CONFIG_FILE)
}

/// Write the default document under `default_root`.
///
/// # Errors
/// [`WorkspaceError::ConfigAlreadyExists`] if the file is present; I/O
/// errors otherwise.
pub fn init_config(default_root: &Path) -> Result<PathBuf> {
    let path = config_path(default_root);
    if path.exists() {
        return Err(WorkspaceError::ConfigAlreadyExists { path }.into());
    }
    let mut doc = serde_json::to_string_pretty(&Config::default())
        .context("Failed to serialize default config")?;
    doc.push('\n');
    std::fs::write(&path, doc).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
