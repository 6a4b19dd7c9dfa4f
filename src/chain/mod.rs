//! Chain resolution - pure functions over a flat list of merge requests
//!
//! No I/O happens here. The remote walk in [`crate::fetch`] uses the same
//! [`Direction`] semantics, so both produce the same chain for the same data.

mod graph;
mod linearize;
mod resolve;

pub use graph::ChainGraph;
pub use linearize::linearize_from_default_branch;
pub use resolve::{build_chain, resolve_children, resolve_parents};

use crate::types::MergeRequest;

/// Default bound on traversal depth
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Which way a traversal walks from the current merge request
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Towards the merge requests the current one is stacked on
    Parents,
    /// Towards the merge requests stacked on the current one
    Children,
}

impl Direction {
    /// Branch whose candidates are looked up after reaching `mr`
    ///
    /// The traversal starts from the current merge request's branch of
    /// interest and repeats the same relation from every match.
    pub fn branch_of_interest(self, mr: &MergeRequest) -> &str {
        match self {
            Self::Parents => &mr.target_branch,
            Self::Children => &mr.source_branch,
        }
    }

    /// The other branch of `mr`, already "behind" the traversal
    pub(crate) fn origin_branch(self, mr: &MergeRequest) -> &str {
        match self {
            Self::Parents => &mr.source_branch,
            Self::Children => &mr.target_branch,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parents => write!(f, "parents"),
            Self::Children => write!(f, "children"),
        }
    }
}
