use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use tracing::instrument;

use super::WorkspaceManager;
use crate::config::Config;
use crate::exec::CommandRunner;
use crate::layout::container_dir_for;
use crate::listing::parse_listing;
use crate::names::DEFAULT_WORKSPACE;
use crate::repo::{absolute_path, locate_root, resolve_default_root};

/// One row of `jjws list`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListedWorkspace {
    pub name: String,
    pub path: PathBuf,
    pub is_default: bool,
    /// The caller is inside this workspace.
    pub is_current: bool,
    /// The workspace directory is present on disk.
    pub exists: bool,
    /// Change id jj reports for this workspace, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

impl<R: CommandRunner> WorkspaceManager<R> {
    /// Every workspace jj knows about, the default one first.
    ///
    /// # Errors
    /// [`crate::WorkspaceError::ExternalTool`] if `jj workspace list` fails.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<ListedWorkspace>> {
        let current = locate_root(&self.cwd)?;
        let default_root = resolve_default_root(&self.cwd)?;
        let config = Config::load_for(&default_root);
        let container = container_dir_for(&default_root, config.suffix())?;

        let listing = self.workspace_list(&default_root)?;
        let entries = parse_listing(&listing);

        let default_revision = entries
            .iter()
            .find(|e| e.name == DEFAULT_WORKSPACE)
            .and_then(|e| e.revision_id().map(ToOwned::to_owned));

        let mut rows = vec![ListedWorkspace {
            name: DEFAULT_WORKSPACE.to_owned(),
            is_current: current == default_root,
            exists: default_root.exists(),
            path: default_root,
            is_default: true,
            revision: default_revision,
        }];

        for entry in entries.iter().filter(|e| e.name != DEFAULT_WORKSPACE) {
            let path = container.join(&entry.name);
            let exists = path.exists();
            rows.push(ListedWorkspace {
                name: entry.name.clone(),
                is_current: exists && absolute_path(&path) == current,
                exists,
                path,
                is_default: false,
                revision: entry.revision_id().map(ToOwned::to_owned),
            });
        }
        Ok(rows)
    }
}

/// Human-readable listing: `*` marks the current workspace, `✗` a missing one.
#[must_use]
pub fn render_text(rows: &[ListedWorkspace]) -> String {
    let mut out = String::new();
    for row in rows {
        let marker = if row.is_current { '*' } else { ' ' };
        if row.exists {
            let _ = writeln!(out, "{marker} {}: {}", row.name, row.path.display());
        } else {
            let _ = writeln!(out, "{marker} {}: ✗ missing", row.name);
        }
    }
    out
}
