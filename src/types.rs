//! Core types for mr-chain

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Merge request state
///
/// GitLab reports `opened`, `merged`, `closed` (and `locked` for a short
/// window while merging). A record without a state counts as opened;
/// anything unrecognized is [`MergeRequestState::Unknown`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeRequestState {
    /// Open for review
    #[default]
    Opened,
    /// Merged into its target branch
    Merged,
    /// Closed without merging
    Closed,
    /// Any state this tool does not know about
    #[serde(other)]
    Unknown,
}

impl MergeRequestState {
    /// CSS-style class used by the diagram renderer
    pub const fn class_name(self) -> &'static str {
        match self {
            Self::Opened => "mr-status-opened",
            Self::Merged => "mr-status-merged",
            Self::Closed => "mr-status-closed",
            Self::Unknown => "mr-status-unknown",
        }
    }

    /// Single-character status icon
    pub const fn icon(self) -> char {
        match self {
            Self::Opened => '●',
            Self::Merged => '✓',
            Self::Closed => '×',
            Self::Unknown => '○',
        }
    }
}

impl std::fmt::Display for MergeRequestState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Opened => write!(f, "opened"),
            Self::Merged => write!(f, "merged"),
            Self::Closed => write!(f, "closed"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A merge request as returned by the GitLab REST API
///
/// Only the fields the chain logic and renderers use are kept; the rest
/// of GitLab's payload is ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Instance-wide unique id
    pub id: u64,
    /// Project-scoped display number (`!iid`)
    pub iid: u64,
    /// Title
    pub title: String,
    /// Branch whose changes are proposed
    pub source_branch: String,
    /// Branch the changes land in
    pub target_branch: String,
    /// Web URL of the merge request page
    pub web_url: String,
    /// Current state
    #[serde(default)]
    pub state: MergeRequestState,
    /// Whether the merge request is marked as draft
    #[serde(default)]
    pub draft: bool,
    /// Last update time, if reported
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MergeRequest {
    /// Whether `self` is stacked directly on `base`
    ///
    /// True when `self` targets the branch `base` proposes to merge.
    pub fn is_stacked_on(&self, base: &Self) -> bool {
        self.target_branch == base.source_branch
    }

    /// `!iid` reference as shown in the GitLab UI
    pub fn reference(&self) -> String {
        format!("!{}", self.iid)
    }
}

/// Filter applied to merge request list queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StateFilter {
    /// Only open merge requests
    #[default]
    Opened,
    /// Only merged merge requests
    Merged,
    /// Only closed merge requests
    Closed,
    /// No state filter
    All,
}

impl StateFilter {
    /// Value for GitLab's `state` query parameter
    pub const fn as_query(self) -> &'static str {
        match self {
            Self::Opened => "opened",
            Self::Merged => "merged",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }

    /// Whether a merge request in `state` passes this filter
    pub fn matches(self, state: MergeRequestState) -> bool {
        match self {
            Self::Opened => state == MergeRequestState::Opened,
            Self::Merged => state == MergeRequestState::Merged,
            Self::Closed => state == MergeRequestState::Closed,
            Self::All => true,
        }
    }
}

impl std::str::FromStr for StateFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "opened" | "open" => Ok(Self::Opened),
            "merged" => Ok(Self::Merged),
            "closed" => Ok(Self::Closed),
            "all" => Ok(Self::All),
            other => Err(format!(
                "unknown state '{other}' (expected opened, merged, closed or all)"
            )),
        }
    }
}

/// A GitLab project, by numeric id or by `group/name` path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectRef {
    /// Numeric project id
    Id(u64),
    /// Full namespace path (e.g. `group/subgroup/repo`)
    Path(String),
}

impl ProjectRef {
    /// Parse a project given on the command line
    ///
    /// All-digit input is an id, everything else a path.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim().trim_matches('/');
        trimmed
            .parse::<u64>()
            .map_or_else(|_| Self::Path(trimmed.to_string()), Self::Id)
    }

    /// Path segment for `/api/v4/projects/{segment}`
    pub fn api_segment(&self) -> String {
        match self {
            Self::Id(id) => id.to_string(),
            Self::Path(path) => urlencoding::encode(path).into_owned(),
        }
    }
}

impl std::fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Path(path) => write!(f, "{path}"),
        }
    }
}

/// The resolved chain around one merge request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainResult {
    /// The merge request the chain was built around
    pub current: MergeRequest,
    /// Merge requests `current` is stacked on, nearest first
    pub parents: Vec<MergeRequest>,
    /// Merge requests stacked on `current`, nearest first
    pub children: Vec<MergeRequest>,
}

impl ChainResult {
    /// All merge requests in the chain: parents farthest first, then
    /// `current`, then children
    pub fn ordered(&self) -> Vec<&MergeRequest> {
        self.parents
            .iter()
            .rev()
            .chain(std::iter::once(&self.current))
            .chain(self.children.iter())
            .collect()
    }
}
