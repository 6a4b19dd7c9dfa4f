//! Sibling-aware parent/child resolution around one merge request

use super::{ChainGraph, Direction};
use crate::types::{ChainResult, MergeRequest};
use std::collections::HashSet;

/// Merge requests `current` is stacked on, nearest first
///
/// Starting at `current.target_branch`, repeatedly takes the merge request
/// whose source branch is the branch of interest and continues from its
/// target branch. Stops on a missing link, after `max_depth` steps, or when
/// a branch comes round a second time.
pub fn resolve_parents(
    current: &MergeRequest,
    all: &[MergeRequest],
    max_depth: usize,
) -> Vec<MergeRequest> {
    let graph = ChainGraph::build(all);
    walk(&graph, current, Direction::Parents, max_depth)
}

/// Merge requests stacked on `current`, depth-first, nearest first
///
/// Starting at `current.source_branch`, takes every merge request targeting
/// the branch of interest. Each sibling is followed through its own source
/// branch before the next sibling is visited.
pub fn resolve_children(
    current: &MergeRequest,
    all: &[MergeRequest],
    max_depth: usize,
) -> Vec<MergeRequest> {
    let graph = ChainGraph::build(all);
    walk(&graph, current, Direction::Children, max_depth)
}

/// Resolve parents and children of `current` in one go
pub fn build_chain(current: &MergeRequest, all: &[MergeRequest], max_depth: usize) -> ChainResult {
    let graph = ChainGraph::build(all);
    ChainResult {
        current: current.clone(),
        parents: walk(&graph, current, Direction::Parents, max_depth),
        children: walk(&graph, current, Direction::Children, max_depth),
    }
}

fn walk<'a>(
    graph: &ChainGraph<'a>,
    current: &'a MergeRequest,
    direction: Direction,
    max_depth: usize,
) -> Vec<MergeRequest> {
    let mut walker = Walker {
        graph,
        current,
        direction,
        max_depth,
        visited: HashSet::from([direction.origin_branch(current)]),
        found: Vec::new(),
    };
    walker.visit(direction.branch_of_interest(current), 0);
    walker.found.into_iter().cloned().collect()
}

struct Walker<'g, 'a> {
    graph: &'g ChainGraph<'a>,
    current: &'a MergeRequest,
    direction: Direction,
    max_depth: usize,
    visited: HashSet<&'a str>,
    found: Vec<&'a MergeRequest>,
}

impl<'a> Walker<'_, 'a> {
    fn visit(&mut self, branch: &'a str, depth: usize) {
        if depth >= self.max_depth || !self.visited.insert(branch) {
            return;
        }

        let matches: Vec<&'a MergeRequest> = match self.direction {
            Direction::Parents => self.graph.sourced_from(branch).into_iter().collect(),
            Direction::Children => self.graph.targeting(branch).to_vec(),
        };

        for mr in matches {
            if mr.id == self.current.id {
                continue;
            }
            self.found.push(mr);
            self.visit(self.direction.branch_of_interest(mr), depth + 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MergeRequestState;

    fn mr(iid: u64, source: &str, target: &str) -> MergeRequest {
        MergeRequest {
            id: iid - 100,
            iid,
            title: format!("MR {iid}"),
            source_branch: source.to_string(),
            target_branch: target.to_string(),
            web_url: format!("#mr-{iid}"),
            state: MergeRequestState::Opened,
            draft: false,
            updated_at: None,
        }
    }

    fn iids(mrs: &[MergeRequest]) -> Vec<u64> {
        mrs.iter().map(|m| m.iid).collect()
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let current = mr(101, "feature-a", "main");
        assert!(resolve_parents(&current, &[], 10).is_empty());
        assert!(resolve_children(&current, &[], 10).is_empty());
    }

    #[test]
    fn test_parent_of_stacked_mr() {
        let tests = mr(102, "feature-a-tests", "feature-a");
        let base = mr(101, "feature-a", "main");
        let all = vec![tests.clone(), base];

        assert_eq!(iids(&resolve_parents(&tests, &all, 10)), vec![101]);
    }

    #[test]
    fn test_child_of_base_mr() {
        let tests = mr(102, "feature-a-tests", "feature-a");
        let base = mr(101, "feature-a", "main");
        let all = vec![tests, base.clone()];

        assert_eq!(iids(&resolve_children(&base, &all, 10)), vec![102]);
    }

    #[test]
    fn test_max_depth_truncates_parents() {
        // a -> b -> c -> main
        let c = mr(101, "c", "main");
        let b = mr(102, "b", "c");
        let a = mr(103, "a", "b");
        let all = vec![c, b, a.clone()];

        assert_eq!(iids(&resolve_parents(&a, &all, 1)), vec![102]);
        assert_eq!(iids(&resolve_parents(&a, &all, 10)), vec![102, 101]);
        assert!(resolve_parents(&a, &all, 0).is_empty());
    }

    #[test]
    fn test_children_siblings_depth_first() {
        let base = mr(101, "feature-a", "main");
        let tests = mr(102, "feature-a-tests", "feature-a");
        let comp = mr(103, "feature-b", "feature-a");
        let style = mr(104, "feature-b-style", "feature-b");
        let all = vec![base.clone(), tests, comp, style];

        assert_eq!(iids(&resolve_children(&base, &all, 10)), vec![102, 103, 104]);
    }

    #[test]
    fn test_children_depth_bound_applies_per_path() {
        let base = mr(101, "feature-a", "main");
        let all = vec![
            base.clone(),
            mr(102, "feature-a-tests", "feature-a"),
            mr(103, "feature-b", "feature-a"),
            mr(104, "feature-b-style", "feature-b"),
        ];

        assert_eq!(iids(&resolve_children(&base, &all, 1)), vec![102, 103]);
    }

    #[test]
    fn test_self_loop_never_includes_current() {
        let current = mr(101, "loop", "loop");
        let all = vec![current.clone()];

        assert!(resolve_parents(&current, &all, 10).is_empty());
        assert!(resolve_children(&current, &all, 10).is_empty());
    }

    #[test]
    fn test_cycle_terminates() {
        // x: a -> b, y: b -> a
        let x = mr(101, "a", "b");
        let y = mr(102, "b", "a");
        let all = vec![x.clone(), y];

        assert_eq!(iids(&resolve_parents(&x, &all, 10)), vec![102]);
        assert_eq!(iids(&resolve_children(&x, &all, 10)), vec![102]);
    }

    #[test]
    fn test_cycle_not_through_current_terminates() {
        // current stacks on a two-branch loop that never returns to it
        let current = mr(101, "top", "a");
        let all = vec![
            current.clone(),
            mr(102, "a", "b"),
            mr(103, "b", "a"),
        ];

        assert_eq!(iids(&resolve_parents(&current, &all, 10)), vec![102, 103]);
    }

    #[test]
    fn test_current_absent_from_input() {
        let current = mr(102, "feature-a-tests", "feature-a");
        let all = vec![mr(101, "feature-a", "main")];

        assert_eq!(iids(&resolve_parents(&current, &all, 10)), vec![101]);
    }

    #[test]
    fn test_duplicate_source_branch_uses_last() {
        let current = mr(110, "top", "shared");
        let all = vec![mr(101, "shared", "main"), mr(102, "shared", "develop")];

        assert_eq!(iids(&resolve_parents(&current, &all, 10)), vec![102]);
    }

    #[test]
    fn test_build_chain_combines_both_directions() {
        let base = mr(101, "feature-a", "main");
        let middle = mr(102, "feature-b", "feature-a");
        let top = mr(103, "feature-c", "feature-b");
        let all = vec![base, middle.clone(), top];

        let chain = build_chain(&middle, &all, 10);
        assert_eq!(chain.current.iid, 102);
        assert_eq!(iids(&chain.parents), vec![101]);
        assert_eq!(iids(&chain.children), vec![103]);
        let ordered: Vec<u64> = chain.ordered().iter().map(|m| m.iid).collect();
        assert_eq!(ordered, vec![101, 102, 103]);
    }
}
