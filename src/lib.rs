//! mr-chain: visualize chains of stacked GitLab merge requests
//!
//! A merge request whose target branch is another merge request's source
//! branch is stacked on it. This crate rebuilds those stacks from a flat
//! list of merge requests ([`chain`]), walks them remotely against the
//! GitLab API ([`fetch`], [`platform`]) and renders the result ([`render`]).

pub mod chain;
pub mod config;
pub mod error;
pub mod fetch;
pub mod platform;
pub mod render;
pub mod store;
pub mod types;
