//! Persistence for the project map in the user config directory.

use super::{PROJECT_MAP_VERSION, ProjectMap};
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name for mr-chain within the config directory.
const APP_DIR: &str = "mr-chain";

/// Filename for the project map.
const PROJECT_MAP_FILE: &str = "projects.toml";

/// Default location of the project map (`<config dir>/mr-chain/projects.toml`).
///
/// `None` when the platform has no config directory.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(PROJECT_MAP_FILE))
}

/// Load the project map from `path`.
///
/// Returns an empty map if the file doesn't exist.
pub fn load_project_map(path: &Path) -> Result<ProjectMap> {
    if !path.exists() {
        return Ok(ProjectMap::new());
    }

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Store(format!("failed to read {}: {e}", path.display())))?;

    let map: ProjectMap = toml::from_str(&content)
        .map_err(|e| Error::Store(format!("failed to parse {}: {e}", path.display())))?;

    Ok(map)
}

/// Save the project map to `path`.
///
/// Creates the parent directory if it doesn't exist. There is no locking:
/// concurrent writers race and the last one wins.
pub fn save_project_map(path: &Path, map: &ProjectMap) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            fs::create_dir_all(dir)
                .map_err(|e| Error::Store(format!("failed to create {}: {e}", dir.display())))?;
        }
    }

    let mut map_to_save = map.clone();
    map_to_save.version = PROJECT_MAP_VERSION;

    let content = toml::to_string_pretty(&map_to_save)
        .map_err(|e| Error::Store(format!("failed to serialize project map: {e}")))?;

    let content_with_header = format!(
        "# mr-chain project map\n# Auto-generated - manual edits may be overwritten\n\n{content}"
    );

    fs::write(path, content_with_header)
        .map_err(|e| Error::Store(format!("failed to write {}: {e}", path.display())))?;

    Ok(())
}
