//! Merge request sources
//!
//! Provides a unified interface over the GitLab REST API and static fixtures.

mod fixture;
mod gitlab;
mod location;

pub use fixture::FixtureSource;
pub use gitlab::GitLabService;
pub use location::{MergeRequestLocation, MergeRequestTarget, parse_merge_request_url};

use crate::error::Result;
use crate::types::{MergeRequest, ProjectRef, StateFilter};
use async_trait::async_trait;

/// Source of merge request records for one project
///
/// This trait abstracts the GitLab API and in-memory fixtures, allowing the
/// same chain walk to run against either.
#[async_trait]
pub trait MergeRequestSource: Send + Sync {
    /// Fetch one merge request by its project-scoped number
    ///
    /// Fails with [`crate::error::Error::MergeRequestNotFound`] when it does
    /// not exist.
    async fn get_merge_request(&self, iid: u64) -> Result<MergeRequest>;

    /// Merge requests whose target branch is `branch`
    async fn list_by_target_branch(
        &self,
        branch: &str,
        state: StateFilter,
    ) -> Result<Vec<MergeRequest>>;

    /// Merge requests whose source branch is `branch`
    async fn list_by_source_branch(
        &self,
        branch: &str,
        state: StateFilter,
    ) -> Result<Vec<MergeRequest>>;

    /// All merge requests of the project in `state` (first page only)
    async fn list_merge_requests(&self, state: StateFilter) -> Result<Vec<MergeRequest>>;

    /// The project's default branch
    async fn default_branch(&self) -> Result<String>;

    /// The project this source reads from
    fn project(&self) -> &ProjectRef;
}
