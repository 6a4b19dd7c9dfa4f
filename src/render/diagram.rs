//! Node/edge model and the view state it is derived from

use crate::chain::Direction;
use crate::fetch::ChainReport;
use crate::types::{ChainResult, MergeRequest, MergeRequestState};
use serde::Serialize;
use std::collections::{BTreeSet, HashSet};

/// Position of a node relative to the chain's current merge request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// The merge request the chain was built around
    Current,
    /// Something the current merge request is stacked on
    Parent,
    /// Something stacked on the current merge request
    Child,
    /// Member of a default-branch stack (no current merge request)
    Stack,
}

/// One merge request in a diagram
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagramNode {
    /// Merge request number
    pub iid: u64,
    /// Title
    pub title: String,
    /// Page URL
    pub web_url: String,
    /// State, for styling
    pub state: MergeRequestState,
    /// Role in the chain
    pub role: NodeRole,
}

/// `from` is stacked on `to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiagramEdge {
    /// Dependent merge request
    pub from: u64,
    /// Merge request it targets
    pub to: u64,
}

/// A branch lookup that failed, leaving the chain incomplete past it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedLookup {
    /// Direction being walked
    pub direction: Direction,
    /// Branch whose candidates could not be fetched
    pub branch: String,
    /// Visible node the missing merge requests would attach to
    pub anchor: Option<u64>,
}

/// Renderable description of a chain
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Diagram {
    /// Visible nodes, base of the chain first
    pub nodes: Vec<DiagramNode>,
    /// Stacking relations between visible nodes
    pub edges: Vec<DiagramEdge>,
    /// Number of nodes left out because they are hidden
    pub hidden_count: usize,
    /// Lookups that failed while the chain was fetched
    pub failed_lookups: Vec<FailedLookup>,
}

#[derive(Debug, Clone)]
enum ViewContent {
    Chain(ChainResult),
    Stacks(Vec<Vec<MergeRequest>>),
}

/// What is currently shown: the chain data plus hidden nodes
///
/// Interaction is `toggle` followed by a fresh [`ChainView::diagram`]; the
/// diagram depends on nothing but this state.
#[derive(Debug, Clone)]
pub struct ChainView {
    content: ViewContent,
    failures: Vec<(Direction, String)>,
    hidden: BTreeSet<u64>,
}

impl ChainView {
    /// View of a chain around one merge request
    pub const fn chain(chain: ChainResult) -> Self {
        Self {
            content: ViewContent::Chain(chain),
            failures: Vec::new(),
            hidden: BTreeSet::new(),
        }
    }

    /// View of a fetched chain, keeping its failed lookups
    pub fn report(report: &ChainReport) -> Self {
        Self {
            content: ViewContent::Chain(report.chain.clone()),
            failures: report
                .failures
                .iter()
                .map(|f| (f.direction, f.branch.clone()))
                .collect(),
            hidden: BTreeSet::new(),
        }
    }

    /// View of default-branch stacks
    pub const fn stacks(stacks: Vec<Vec<MergeRequest>>) -> Self {
        Self {
            content: ViewContent::Stacks(stacks),
            failures: Vec::new(),
            hidden: BTreeSet::new(),
        }
    }

    /// Flip the hidden flag of `iid`, returning whether it is now hidden
    ///
    /// The current merge request of a chain view cannot be hidden.
    pub fn toggle(&mut self, iid: u64) -> bool {
        if self.is_current(iid) {
            return false;
        }
        if self.hidden.remove(&iid) {
            false
        } else {
            self.hidden.insert(iid);
            true
        }
    }

    /// Hide `iid` (no-op for the current merge request)
    pub fn hide(&mut self, iid: u64) {
        if !self.is_current(iid) {
            self.hidden.insert(iid);
        }
    }

    /// Whether `iid` is hidden
    pub fn is_hidden(&self, iid: u64) -> bool {
        self.hidden.contains(&iid)
    }

    /// Build the diagram for the current state
    pub fn diagram(&self) -> Diagram {
        let members: Vec<(&MergeRequest, NodeRole)> = match &self.content {
            ViewContent::Chain(chain) => chain
                .parents
                .iter()
                .rev()
                .map(|mr| (mr, NodeRole::Parent))
                .chain(std::iter::once((&chain.current, NodeRole::Current)))
                .chain(chain.children.iter().map(|mr| (mr, NodeRole::Child)))
                .collect(),
            ViewContent::Stacks(stacks) => stacks
                .iter()
                .flatten()
                .map(|mr| (mr, NodeRole::Stack))
                .collect(),
        };

        let mut seen = HashSet::new();
        let mut visible = Vec::new();
        let mut hidden_count = 0;
        for (mr, role) in members {
            if !seen.insert(mr.iid) {
                continue;
            }
            if self.hidden.contains(&mr.iid) {
                hidden_count += 1;
            } else {
                visible.push((mr, role));
            }
        }

        let edges = visible
            .iter()
            .flat_map(|(from, _)| {
                visible
                    .iter()
                    .filter(move |(to, _)| to.iid != from.iid && from.is_stacked_on(to))
                    .map(move |(to, _)| DiagramEdge {
                        from: from.iid,
                        to: to.iid,
                    })
            })
            .collect();

        let failed_lookups = self
            .failures
            .iter()
            .map(|(direction, branch)| FailedLookup {
                direction: *direction,
                branch: branch.clone(),
                anchor: visible
                    .iter()
                    .find(|(mr, role)| {
                        matches!(
                            (direction, role),
                            (_, NodeRole::Current)
                                | (Direction::Parents, NodeRole::Parent)
                                | (Direction::Children, NodeRole::Child)
                        ) && direction.branch_of_interest(mr) == branch.as_str()
                    })
                    .map(|(mr, _)| mr.iid),
            })
            .collect();

        let nodes = visible
            .into_iter()
            .map(|(mr, role)| DiagramNode {
                iid: mr.iid,
                title: mr.title.clone(),
                web_url: mr.web_url.clone(),
                state: mr.state,
                role,
            })
            .collect();

        Diagram {
            nodes,
            edges,
            hidden_count,
            failed_lookups,
        }
    }

    fn is_current(&self, iid: u64) -> bool {
        matches!(&self.content, ViewContent::Chain(chain) if chain.current.iid == iid)
    }
}
