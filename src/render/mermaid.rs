//! Mermaid flowchart output

use super::{Diagram, NodeRole};
use crate::chain::Direction;
use crate::types::MergeRequestState;
use std::fmt::Write;

const CLASS_DEFS: &[(&str, &str)] = &[
    ("opened", "fill:#e9f3ff,stroke:#1f75cb,color:#0b1f33"),
    ("merged", "fill:#f0ebff,stroke:#6e49cb,color:#24104f"),
    ("closed", "fill:#fdecea,stroke:#dd2b0e,color:#4f0a00"),
    ("unknown", "fill:#f0f0f0,stroke:#737278,color:#333238"),
    ("current", "stroke-width:3px"),
    ("failed", "fill:#fff4e5,stroke:#ab6100,color:#4f2d00,stroke-dasharray:5 5"),
];

/// Mermaid class for a merge request state
const fn state_class(state: MergeRequestState) -> &'static str {
    match state {
        MergeRequestState::Opened => "opened",
        MergeRequestState::Merged => "merged",
        MergeRequestState::Closed => "closed",
        MergeRequestState::Unknown => "unknown",
    }
}

fn node_id(iid: u64) -> String {
    format!("MR{iid}")
}

/// Placeholder id for the `index`-th failed lookup
fn failed_id(index: usize) -> String {
    format!("FAILED{}", index + 1)
}

const fn singular(direction: Direction) -> &'static str {
    match direction {
        Direction::Parents => "parent",
        Direction::Children => "child",
    }
}

fn escape(text: &str) -> String {
    text.replace('"', "&quot;")
}

/// Render a diagram as a left-to-right Mermaid flowchart
///
/// Nodes are labelled `#iid - title` and link to the merge request page;
/// an edge `A --> B` means A is stacked on B. Each failed lookup becomes a
/// dashed placeholder node joined to the node it was expanding.
pub fn to_mermaid(diagram: &Diagram) -> String {
    let mut out = String::from("graph LR\n");

    // Writing to a String cannot fail
    for node in &diagram.nodes {
        let id = node_id(node.iid);
        let _ = writeln!(out, "  {id}[\"#{} - {}\"]", node.iid, escape(&node.title));
        let _ = writeln!(out, "  click {id} \"{}\" _blank", escape(&node.web_url));
    }

    for (index, failed) in diagram.failed_lookups.iter().enumerate() {
        let word = singular(failed.direction);
        let _ = writeln!(out, "  %% {word} lookup failed for '{}'", failed.branch);
        let _ = writeln!(
            out,
            "  {}[\"{word} lookup failed: {}\"]",
            failed_id(index),
            escape(&failed.branch)
        );
    }

    for edge in &diagram.edges {
        let _ = writeln!(out, "  {} --> {}", node_id(edge.from), node_id(edge.to));
    }

    for (index, failed) in diagram.failed_lookups.iter().enumerate() {
        let Some(anchor) = failed.anchor else {
            continue;
        };
        let (from, to) = match failed.direction {
            Direction::Parents => (node_id(anchor), failed_id(index)),
            Direction::Children => (failed_id(index), node_id(anchor)),
        };
        let _ = writeln!(out, "  {from} -.-> {to}");
    }

    if diagram.nodes.is_empty() && diagram.failed_lookups.is_empty() {
        return out;
    }

    for (name, style) in CLASS_DEFS {
        let _ = writeln!(out, "  classDef {name} {style}");
    }
    for node in &diagram.nodes {
        let id = node_id(node.iid);
        let _ = writeln!(out, "  class {id} {}", state_class(node.state));
        if node.role == NodeRole::Current {
            let _ = writeln!(out, "  class {id} current");
        }
    }
    for index in 0..diagram.failed_lookups.len() {
        let _ = writeln!(out, "  class {} failed", failed_id(index));
    }

    if diagram.hidden_count > 0 {
        let _ = writeln!(out, "  %% {} hidden merge request(s)", diagram.hidden_count);
    }

    out
}

/// [`to_mermaid`] wrapped in a fenced block for Markdown documents
pub fn to_mermaid_markdown(diagram: &Diagram) -> String {
    format!("```mermaid\n{}```\n", to_mermaid(diagram))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DiagramEdge, DiagramNode, FailedLookup};

    fn node(iid: u64, title: &str, role: NodeRole) -> DiagramNode {
        DiagramNode {
            iid,
            title: title.to_string(),
            web_url: format!("#mr-{iid}"),
            state: MergeRequestState::Opened,
            role,
        }
    }

    #[test]
    fn test_nodes_links_and_edges() {
        let diagram = Diagram {
            nodes: vec![
                node(101, "Base", NodeRole::Parent),
                node(102, "Tests", NodeRole::Current),
            ],
            edges: vec![DiagramEdge { from: 102, to: 101 }],
            hidden_count: 0,
            failed_lookups: vec![],
        };
        let text = to_mermaid(&diagram);

        assert!(text.starts_with("graph LR\n"));
        assert!(text.contains("  MR101[\"#101 - Base\"]\n"));
        assert!(text.contains("  click MR102 \"#mr-102\" _blank\n"));
        assert!(text.contains("  MR102 --> MR101\n"));
        assert!(text.contains("  class MR102 current\n"));
        assert!(!text.contains("class MR101 current"));
        assert!(!text.contains("hidden"));
    }

    #[test]
    fn test_quotes_in_title_are_escaped() {
        let diagram = Diagram {
            nodes: vec![node(7, r#"Fix "quoted" thing"#, NodeRole::Stack)],
            ..Diagram::default()
        };
        assert!(to_mermaid(&diagram).contains("#7 - Fix &quot;quoted&quot; thing"));
    }

    #[test]
    fn test_failed_lookups_get_placeholders() {
        let diagram = Diagram {
            nodes: vec![node(102, "Tests", NodeRole::Current)],
            failed_lookups: vec![
                FailedLookup {
                    direction: Direction::Parents,
                    branch: "feature-a".to_string(),
                    anchor: Some(102),
                },
                FailedLookup {
                    direction: Direction::Children,
                    branch: "feature-a-tests".to_string(),
                    anchor: Some(102),
                },
            ],
            ..Diagram::default()
        };
        let text = to_mermaid(&diagram);

        assert!(text.contains("  %% parent lookup failed for 'feature-a'\n"));
        assert!(text.contains("  FAILED1[\"parent lookup failed: feature-a\"]\n"));
        assert!(text.contains("  MR102 -.-> FAILED1\n"));
        assert!(text.contains("  %% child lookup failed for 'feature-a-tests'\n"));
        assert!(text.contains("  FAILED2 -.-> MR102\n"));
        assert!(text.contains("  class FAILED1 failed\n"));
        assert!(text.contains("  class FAILED2 failed\n"));
    }

    #[test]
    fn test_complete_diagram_has_no_placeholders() {
        let diagram = Diagram {
            nodes: vec![node(102, "Tests", NodeRole::Current)],
            ..Diagram::default()
        };
        assert!(!to_mermaid(&diagram).contains("FAILED"));
    }

    #[test]
    fn test_empty_diagram_is_header_only() {
        assert_eq!(to_mermaid(&Diagram::default()), "graph LR\n");
    }

    #[test]
    fn test_hidden_count_comment_and_markdown_fence() {
        let diagram = Diagram {
            nodes: vec![node(1, "One", NodeRole::Current)],
            edges: vec![],
            hidden_count: 2,
            failed_lookups: vec![],
        };
        assert!(to_mermaid(&diagram).contains("%% 2 hidden merge request(s)"));

        let md = to_mermaid_markdown(&diagram);
        assert!(md.starts_with("```mermaid\ngraph LR\n"));
        assert!(md.ends_with("```\n"));
    }
}
