//! Single-path stacks rooted at the default branch

use super::ChainGraph;
use crate::types::MergeRequest;
use std::collections::HashSet;

/// Split merge requests into stacks rooted at `default_branch`
///
/// Every merge request targeting `default_branch` starts a stack. A stack
/// grows by taking the *first* merge request (input order) that targets the
/// tail's source branch; other candidates are ignored. Growth stops when no
/// candidate exists or the candidate's source branch is already part of the
/// stack.
pub fn linearize_from_default_branch(
    all: &[MergeRequest],
    default_branch: &str,
) -> Vec<Vec<MergeRequest>> {
    let graph = ChainGraph::build(all);

    graph
        .targeting(default_branch)
        .iter()
        .map(|&root| {
            let mut stack = vec![root];
            let mut seen: HashSet<&str> =
                HashSet::from([default_branch, root.source_branch.as_str()]);
            let mut tail = root;

            while let Some(&next) = graph.targeting(&tail.source_branch).first() {
                if !seen.insert(next.source_branch.as_str()) {
                    break;
                }
                stack.push(next);
                tail = next;
            }

            stack.into_iter().cloned().collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MergeRequestState;

    fn mr(iid: u64, source: &str, target: &str) -> MergeRequest {
        MergeRequest {
            id: iid,
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

    fn iids(stacks: &[Vec<MergeRequest>]) -> Vec<Vec<u64>> {
        stacks
            .iter()
            .map(|s| s.iter().map(|m| m.iid).collect())
            .collect()
    }

    #[test]
    fn test_two_roots_make_two_stacks() {
        let all = vec![mr(1, "feature-a", "main"), mr(2, "feature-b", "main")];
        let stacks = linearize_from_default_branch(&all, "main");

        assert_eq!(iids(&stacks), vec![vec![1], vec![2]]);
    }

    #[test]
    fn test_follows_first_candidate_only() {
        let all = vec![
            mr(101, "feature-a", "main"),
            mr(102, "feature-a-tests", "feature-a"),
            mr(103, "feature-b", "feature-a"),
            mr(104, "feature-b-style", "feature-b"),
        ];
        let stacks = linearize_from_default_branch(&all, "main");

        // 103 and 104 are never reached: 102 was discovered first
        assert_eq!(iids(&stacks), vec![vec![101, 102]]);
    }

    #[test]
    fn test_no_roots() {
        let all = vec![mr(1, "a", "develop")];
        assert!(linearize_from_default_branch(&all, "main").is_empty());
        assert!(linearize_from_default_branch(&[], "main").is_empty());
    }

    #[test]
    fn test_cycle_above_root_terminates() {
        let all = vec![
            mr(1, "a", "main"),
            mr(2, "b", "a"),
            mr(3, "a", "b"),
        ];
        let stacks = linearize_from_default_branch(&all, "main");

        assert_eq!(iids(&stacks), vec![vec![1, 2]]);
    }

    #[test]
    fn test_self_loop_on_default_branch() {
        let all = vec![mr(1, "main", "main")];
        assert_eq!(iids(&linearize_from_default_branch(&all, "main")), vec![vec![1]]);
    }
}
