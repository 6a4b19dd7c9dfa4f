//! Project path to project id mapping
//!
//! The only state mr-chain keeps between runs: which numeric GitLab project
//! id belongs to a `group/repo` path, so URLs can be resolved without asking
//! again.

mod storage;

pub use storage::{default_store_path, load_project_map, save_project_map};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current project map format version
pub const PROJECT_MAP_VERSION: u32 = 1;

/// Key the mapping is stored under
pub const PROJECT_MAP_NAMESPACE: &str = "gitlab_project_id_mapping";

/// Persistent project path → id mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMap {
    /// Format version
    #[serde(default = "default_version")]
    pub version: u32,
    /// Path → id entries (the namespace table)
    #[serde(rename = "gitlab_project_id_mapping", default)]
    pub projects: BTreeMap<String, u64>,
}

const fn default_version() -> u32 {
    PROJECT_MAP_VERSION
}

impl Default for ProjectMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectMap {
    /// Create an empty map
    pub const fn new() -> Self {
        Self {
            version: PROJECT_MAP_VERSION,
            projects: BTreeMap::new(),
        }
    }

    /// Id stored for `path`
    pub fn get(&self, path: &str) -> Option<u64> {
        self.projects.get(normalize(path)).copied()
    }

    /// Store `id` for `path`, returning the id it replaced
    pub fn set(&mut self, path: &str, id: u64) -> Option<u64> {
        self.projects.insert(normalize(path).to_string(), id)
    }

    /// Forget `path`, returning its id if it was stored
    pub fn remove(&mut self, path: &str) -> Option<u64> {
        self.projects.remove(normalize(path))
    }

    /// Entries in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.projects.iter().map(|(path, id)| (path.as_str(), *id))
    }

    /// Whether no project is stored
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

fn normalize(path: &str) -> &str {
    path.trim().trim_matches('/')
}
