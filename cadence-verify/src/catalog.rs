//! Scenario catalog — YAML files of scenario definitions.
//!
//! A catalog file is a YAML sequence of scenarios. All functions take an
//! explicit path; nothing here consults the environment.

use std::path::Path;

use crate::error::{io_err, VerifyError};
use crate::scenario::Scenario;

/// Load one catalog file.
///
/// Returns `VerifyError::CatalogNotFound` if absent, `VerifyError::Parse`
/// (with path and line context) if malformed.
pub fn load(path: &Path) -> Result<Vec<Scenario>, VerifyError> {
    if !path.exists() {
        return Err(VerifyError::CatalogNotFound {
            path: path.to_path_buf(),
        });
    }
    let contents = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    serde_yaml::from_str(&contents).map_err(|e| VerifyError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load every `*.yaml` / `*.yml` file in a directory, in file-name order.
///
/// Non-YAML entries and subdirectories are skipped.
pub fn load_dir(dir: &Path) -> Result<Vec<Scenario>, VerifyError> {
    if !dir.exists() {
        return Err(VerifyError::CatalogNotFound {
            path: dir.to_path_buf(),
        });
    }
    let mut entries: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| io_err(dir, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let mut scenarios = Vec::new();
    for entry in entries {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if !name.ends_with(".yaml") && !name.ends_with(".yml") {
            continue;
        }
        scenarios.extend(load(&entry.path())?);
    }
    Ok(scenarios)
}
