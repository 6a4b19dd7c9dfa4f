//! Shared test utilities

#![allow(dead_code)]

mod mock_source;

pub use mock_source::MockSource;

use mr_chain::types::{MergeRequest, MergeRequestState};
use std::path::PathBuf;

/// Open merge request `iid` from `source` into `target`
pub fn make_mr(iid: u64, source: &str, target: &str) -> MergeRequest {
    MergeRequest {
        id: 1000 + iid,
        iid,
        title: format!("MR {iid}"),
        source_branch: source.to_string(),
        target_branch: target.to_string(),
        web_url: format!("https://gitlab.example.com/group/repo/-/merge_requests/{iid}"),
        state: MergeRequestState::Opened,
        draft: false,
        updated_at: None,
    }
}

/// The four-request sample stack:
///
/// ```text
/// main <- feature-a (101) <- feature-a-tests (102)
///                         <- feature-b (103) <- feature-b-style (104)
/// ```
pub fn sample_requests() -> Vec<MergeRequest> {
    vec![
        make_mr(101, "feature-a", "main"),
        make_mr(102, "feature-a-tests", "feature-a"),
        make_mr(103, "feature-b", "feature-a"),
        make_mr(104, "feature-b-style", "feature-b"),
    ]
}

/// Iids in order
pub fn iids(mrs: &[MergeRequest]) -> Vec<u64> {
    mrs.iter().map(|mr| mr.iid).collect()
}

/// Path of the bundled sample fixture
pub fn sample_fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos/sample_merge_requests.json")
}
