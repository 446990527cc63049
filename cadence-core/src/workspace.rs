//! Workspace fixture file — a single YAML document of raw records.
//!
//! # File layout
//!
//! ```text
//! version: 1
//! projects: [...]
//! sprints:  [...]
//! tasks:    [...]
//! ```
//!
//! All functions take an explicit path; nothing here consults the
//! environment. Saves are atomic: serialize → `.yaml.tmp` sibling → rename.
//! The `.tmp` is always in the same directory as the target (same
//! filesystem — no EXDEV).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{io_err, StoreError};
use crate::types::{Project, Sprint, Task};

/// Current on-disk format version.
pub const WORKSPACE_VERSION: u32 = 1;

/// Root of a workspace fixture document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceFile {
    pub version: u32,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub sprints: Vec<Sprint>,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Default for WorkspaceFile {
    fn default() -> Self {
        Self {
            version: WORKSPACE_VERSION,
            projects: Vec::new(),
            sprints: Vec::new(),
            tasks: Vec::new(),
        }
    }
}

/// Load a workspace file.
///
/// Returns `StoreError::NotFound` if absent, `StoreError::Parse` (with path
/// and line context) if malformed YAML.
pub fn load(path: &Path) -> Result<WorkspaceFile, StoreError> {
    if !path.exists() {
        return Err(StoreError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_yaml::from_str(&contents).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Atomically save a workspace file.
///
/// Write flow: serialize → `<path>.yaml.tmp` sibling → `rename`.
pub fn save(path: &Path, workspace: &WorkspaceFile) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| io_err(parent, e))?;
    }
    let yaml = serde_yaml::to_string(workspace)?;
    let tmp = path.with_extension("yaml.tmp");
    std::fs::write(&tmp, yaml).map_err(|e| io_err(&tmp, e))?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(path, e));
    }
    Ok(())
}
