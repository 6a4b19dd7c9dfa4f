//! Rendering of resolved chains
//!
//! [`ChainView`] holds what is being shown; [`Diagram`] is derived from it
//! and fed to the output formats ([`to_mermaid`], [`text`]).

mod diagram;
mod mermaid;
pub mod text;

pub use diagram::{ChainView, Diagram, DiagramEdge, DiagramNode, FailedLookup, NodeRole};
pub use mermaid::{to_mermaid, to_mermaid_markdown};
