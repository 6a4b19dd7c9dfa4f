//! Branch-keyed index over a set of merge requests

use crate::types::MergeRequest;
use std::collections::HashMap;

/// Merge requests indexed by branch name
///
/// Built fresh for every resolution and borrowed from the caller's slice.
#[derive(Debug, Default)]
pub struct ChainGraph<'a> {
    by_target_branch: HashMap<&'a str, Vec<&'a MergeRequest>>,
    by_source_branch: HashMap<&'a str, &'a MergeRequest>,
}

impl<'a> ChainGraph<'a> {
    /// Index `requests` by target and source branch
    ///
    /// Target lists keep input order. When two merge requests share a
    /// source branch the later one wins.
    pub fn build(requests: &'a [MergeRequest]) -> Self {
        let mut graph = Self::default();
        for mr in requests {
            graph
                .by_target_branch
                .entry(mr.target_branch.as_str())
                .or_default()
                .push(mr);
            graph.by_source_branch.insert(mr.source_branch.as_str(), mr);
        }
        graph
    }

    /// Merge requests targeting `branch`, in input order
    pub fn targeting(&self, branch: &str) -> &[&'a MergeRequest] {
        self.by_target_branch
            .get(branch)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The merge request whose source is `branch`
    pub fn sourced_from(&self, branch: &str) -> Option<&'a MergeRequest> {
        self.by_source_branch.get(branch).copied()
    }

    /// Whether the graph is empty
    pub fn is_empty(&self) -> bool {
        self.by_source_branch.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MergeRequestState;

    fn mr(id: u64, source: &str, target: &str) -> MergeRequest {
        MergeRequest {
            id,
            iid: id + 100,
            title: format!("MR {id}"),
            source_branch: source.to_string(),
            target_branch: target.to_string(),
            web_url: format!("https://gitlab.example.com/g/r/-/merge_requests/{}", id + 100),
            state: MergeRequestState::Opened,
            draft: false,
            updated_at: None,
        }
    }

    #[test]
    fn test_targeting_preserves_input_order() {
        let requests = vec![mr(1, "a", "main"), mr(2, "b", "main"), mr(3, "c", "a")];
        let graph = ChainGraph::build(&requests);

        let ids: Vec<u64> = graph.targeting("main").iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert!(graph.targeting("nope").is_empty());
    }

    #[test]
    fn test_duplicate_source_branch_last_write_wins() {
        let requests = vec![mr(1, "dup", "main"), mr(2, "dup", "develop")];
        let graph = ChainGraph::build(&requests);

        assert_eq!(graph.sourced_from("dup").map(|m| m.id), Some(2));
    }

    #[test]
    fn test_empty_graph() {
        let graph = ChainGraph::build(&[]);
        assert!(graph.is_empty());
        assert!(graph.sourced_from("main").is_none());
    }
}
