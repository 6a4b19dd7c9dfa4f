//! GitLab merge request source

use crate::error::{Error, Result};
use crate::platform::MergeRequestSource;
use crate::types::{MergeRequest, ProjectRef, StateFilter};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::debug;

/// GitLab service using reqwest
pub struct GitLabService {
    client: Client,
    token: Option<String>,
    base_url: String,
    project: ProjectRef,
}

/// Subset of `GET /projects/:id`
#[derive(Deserialize)]
struct Project {
    default_branch: Option<String>,
}

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Merge requests per list request (GitLab's maximum page size)
const PER_PAGE: &str = "100";

impl GitLabService {
    /// Create a new GitLab service
    ///
    /// `host` is either a bare host name (`gitlab.example.com`, https is
    /// assumed) or a full base URL including scheme. `None` means gitlab.com.
    /// The token, when given, is sent as `PRIVATE-TOKEN` and otherwise not
    /// inspected.
    pub fn new(host: Option<&str>, project: ProjectRef, token: Option<String>) -> Result<Self> {
        Self::with_timeout(host, project, token, DEFAULT_TIMEOUT_SECS)
    }

    /// Create a new GitLab service with an explicit request timeout
    pub fn with_timeout(
        host: Option<&str>,
        project: ProjectRef,
        token: Option<String>,
        timeout_secs: u64,
    ) -> Result<Self> {
        let host = host.unwrap_or("gitlab.com").trim_end_matches('/');
        let base_url = if host.contains("://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::GitLabApi(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            token,
            base_url,
            project,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!(
            "{}/api/v4/projects/{}{}",
            self.base_url,
            self.project.api_segment(),
            path
        )
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.token {
            Some(token) => request.header("PRIVATE-TOKEN", token),
            None => request,
        }
    }

    async fn list(&self, query: &[(&str, &str)]) -> Result<Vec<MergeRequest>> {
        let url = self.api_url("/merge_requests");

        let mrs: Vec<MergeRequest> = self
            .get(&url)
            .query(query)
            .query(&[("per_page", PER_PAGE)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        Ok(mrs)
    }
}

#[async_trait]
impl MergeRequestSource for GitLabService {
    async fn get_merge_request(&self, iid: u64) -> Result<MergeRequest> {
        debug!(mr_iid = iid, project = %self.project, "fetching MR");
        let url = self.api_url(&format!("/merge_requests/{iid}"));

        let response = self.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::MergeRequestNotFound(iid));
        }

        let mr: MergeRequest = response
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        debug!(mr_iid = mr.iid, source = %mr.source_branch, target = %mr.target_branch, "fetched MR");
        Ok(mr)
    }

    async fn list_by_target_branch(
        &self,
        branch: &str,
        state: StateFilter,
    ) -> Result<Vec<MergeRequest>> {
        debug!(target_branch = branch, state = state.as_query(), "listing MRs by target");
        let mrs = self
            .list(&[("target_branch", branch), ("state", state.as_query())])
            .await?;
        debug!(target_branch = branch, count = mrs.len(), "listed MRs by target");
        Ok(mrs)
    }

    async fn list_by_source_branch(
        &self,
        branch: &str,
        state: StateFilter,
    ) -> Result<Vec<MergeRequest>> {
        debug!(source_branch = branch, state = state.as_query(), "listing MRs by source");
        let mrs = self
            .list(&[("source_branch", branch), ("state", state.as_query())])
            .await?;
        debug!(source_branch = branch, count = mrs.len(), "listed MRs by source");
        Ok(mrs)
    }

    async fn list_merge_requests(&self, state: StateFilter) -> Result<Vec<MergeRequest>> {
        debug!(state = state.as_query(), "listing project MRs");
        let mrs = self.list(&[("state", state.as_query())]).await?;
        debug!(count = mrs.len(), "listed project MRs");
        Ok(mrs)
    }

    async fn default_branch(&self) -> Result<String> {
        let url = self.api_url("");

        let project: Project = self
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::GitLabApi(e.to_string()))?
            .json()
            .await?;

        project.default_branch.ok_or_else(|| {
            Error::GitLabApi(format!("project {} has no default branch", self.project))
        })
    }

    fn project(&self) -> &ProjectRef {
        &self.project
    }
}
