//! Static merge request source backed by a JSON fixture

use crate::error::{Error, Result};
use crate::platform::MergeRequestSource;
use crate::types::{MergeRequest, ProjectRef, StateFilter};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

/// Bundled demo fixture
const SAMPLE_FIXTURE: &str = include_str!("../../demos/sample_merge_requests.json");

/// Default branch assumed when a fixture does not name one
const FALLBACK_DEFAULT_BRANCH: &str = "main";

/// Fixture file layout: either a bare array of merge requests or an object
/// with project details
#[derive(Deserialize)]
#[serde(untagged)]
enum FixtureFile {
    WithProject {
        project: FixtureProject,
        merge_requests: Vec<MergeRequest>,
    },
    Bare(Vec<MergeRequest>),
}

#[derive(Deserialize)]
struct FixtureProject {
    id: Option<u64>,
    #[serde(alias = "path_with_namespace")]
    path: Option<String>,
    default_branch: Option<String>,
}

/// In-memory merge request source
///
/// Answers the same queries as the GitLab API from a fixed list.
#[derive(Debug, Clone)]
pub struct FixtureSource {
    project: ProjectRef,
    default_branch: String,
    requests: Vec<MergeRequest>,
}

impl FixtureSource {
    /// Create a source over `requests`
    pub fn new(
        project: ProjectRef,
        default_branch: impl Into<String>,
        requests: Vec<MergeRequest>,
    ) -> Self {
        Self {
            project,
            default_branch: default_branch.into(),
            requests,
        }
    }

    /// Parse a fixture from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        let file: FixtureFile = serde_json::from_str(json)
            .map_err(|e| Error::Fixture(format!("failed to parse fixture: {e}")))?;

        Ok(match file {
            FixtureFile::WithProject {
                project,
                merge_requests,
            } => {
                let project_ref = match (project.id, project.path) {
                    (Some(id), _) => ProjectRef::Id(id),
                    (None, Some(path)) => ProjectRef::Path(path),
                    (None, None) => ProjectRef::Id(0),
                };
                Self::new(
                    project_ref,
                    project
                        .default_branch
                        .unwrap_or_else(|| FALLBACK_DEFAULT_BRANCH.to_string()),
                    merge_requests,
                )
            }
            FixtureFile::Bare(merge_requests) => {
                Self::new(ProjectRef::Id(0), FALLBACK_DEFAULT_BRANCH, merge_requests)
            }
        })
    }

    /// Load a fixture file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Fixture(format!("failed to read {}: {e}", path.display())))?;
        let source = Self::from_json(&content)?;
        debug!(path = %path.display(), count = source.requests.len(), "loaded fixture");
        Ok(source)
    }

    /// The bundled four-MR demo project
    pub fn sample() -> Result<Self> {
        Self::from_json(SAMPLE_FIXTURE)
    }

    /// All merge requests, regardless of state
    pub fn requests(&self) -> &[MergeRequest] {
        &self.requests
    }

    fn filtered(
        &self,
        state: StateFilter,
        pred: impl Fn(&MergeRequest) -> bool,
    ) -> Vec<MergeRequest> {
        self.requests
            .iter()
            .filter(|mr| state.matches(mr.state) && pred(mr))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MergeRequestSource for FixtureSource {
    async fn get_merge_request(&self, iid: u64) -> Result<MergeRequest> {
        self.requests
            .iter()
            .find(|mr| mr.iid == iid)
            .cloned()
            .ok_or(Error::MergeRequestNotFound(iid))
    }

    async fn list_by_target_branch(
        &self,
        branch: &str,
        state: StateFilter,
    ) -> Result<Vec<MergeRequest>> {
        Ok(self.filtered(state, |mr| mr.target_branch == branch))
    }

    async fn list_by_source_branch(
        &self,
        branch: &str,
        state: StateFilter,
    ) -> Result<Vec<MergeRequest>> {
        Ok(self.filtered(state, |mr| mr.source_branch == branch))
    }

    async fn list_merge_requests(&self, state: StateFilter) -> Result<Vec<MergeRequest>> {
        Ok(self.filtered(state, |_| true))
    }

    async fn default_branch(&self) -> Result<String> {
        Ok(self.default_branch.clone())
    }

    fn project(&self) -> &ProjectRef {
        &self.project
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MergeRequestState;

    #[test]
    fn test_sample_fixture_loads() {
        let source = FixtureSource::sample().unwrap();
        assert_eq!(source.project(), &ProjectRef::Id(123));
        assert_eq!(source.requests().len(), 4);
        assert_eq!(tokio_test::block_on(source.default_branch()).unwrap(), "main");
    }

    #[test]
    fn test_bare_array_fixture() {
        let source = FixtureSource::from_json(
            r#"[{"id":1,"iid":7,"title":"t","source_branch":"a","target_branch":"main","web_url":"u"}]"#,
        )
        .unwrap();
        assert_eq!(source.project(), &ProjectRef::Id(0));
        assert_eq!(source.requests()[0].state, MergeRequestState::Opened);
    }

    #[test]
    fn test_invalid_fixture_is_fixture_error() {
        let err = FixtureSource::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Fixture(_)));
    }

    #[tokio::test]
    async fn test_queries_filter_by_branch_and_state() {
        let mut source = FixtureSource::sample().unwrap();
        source.requests[3].state = MergeRequestState::Merged;

        let targeting = source
            .list_by_target_branch("feature-a", StateFilter::Opened)
            .await
            .unwrap();
        assert_eq!(targeting.iter().map(|m| m.iid).collect::<Vec<_>>(), vec![102, 103]);

        let merged = source
            .list_by_source_branch("feature-b-style", StateFilter::Opened)
            .await
            .unwrap();
        assert!(merged.is_empty());

        let all = source.list_merge_requests(StateFilter::All).await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_get_missing_merge_request() {
        let source = FixtureSource::sample().unwrap();
        let err = source.get_merge_request(999).await.unwrap_err();
        assert!(matches!(err, Error::MergeRequestNotFound(999)));
    }
}
