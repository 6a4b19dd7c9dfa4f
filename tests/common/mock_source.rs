//! Mock merge request source for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use mr_chain::error::{Error, Result};
use mr_chain::platform::MergeRequestSource;
use mr_chain::types::{MergeRequest, ProjectRef, StateFilter};
use std::collections::HashMap;
use std::sync::Mutex;

/// Mock merge request source for testing
///
/// Serves a fixed list of merge requests like `FixtureSource`, and adds:
/// - Call tracking for verification
/// - Error injection per branch for failure path testing
pub struct MockSource {
    project: ProjectRef,
    default_branch: String,
    requests: Vec<MergeRequest>,
    // Call tracking
    get_calls: Mutex<Vec<u64>>,
    by_target_calls: Mutex<Vec<String>>,
    by_source_calls: Mutex<Vec<String>>,
    list_calls: Mutex<usize>,
    // Error injection
    error_on_get: Mutex<Option<String>>,
    error_on_target: Mutex<HashMap<String, String>>,
    error_on_source: Mutex<HashMap<String, String>>,
}

impl MockSource {
    /// Create a mock serving `requests` for project 1 with default branch `main`
    pub fn new(requests: Vec<MergeRequest>) -> Self {
        Self {
            project: ProjectRef::Id(1),
            default_branch: "main".to_string(),
            requests,
            get_calls: Mutex::new(Vec::new()),
            by_target_calls: Mutex::new(Vec::new()),
            by_source_calls: Mutex::new(Vec::new()),
            list_calls: Mutex::new(0),
            error_on_get: Mutex::new(None),
            error_on_target: Mutex::new(HashMap::new()),
            error_on_source: Mutex::new(HashMap::new()),
        }
    }

    // === Error injection methods ===

    /// Make `get_merge_request` return an error
    pub fn fail_get(&self, msg: &str) {
        *self.error_on_get.lock().unwrap() = Some(msg.to_string());
    }

    /// Make child lookups (by target branch) of `branch` fail
    pub fn fail_children_of(&self, branch: &str, msg: &str) {
        self.error_on_target
            .lock()
            .unwrap()
            .insert(branch.to_string(), msg.to_string());
    }

    /// Make parent lookups (by source branch) of `branch` fail
    pub fn fail_parent_of(&self, branch: &str, msg: &str) {
        self.error_on_source
            .lock()
            .unwrap()
            .insert(branch.to_string(), msg.to_string());
    }

    // === Call tracking ===

    /// Iids passed to `get_merge_request`
    pub fn get_calls(&self) -> Vec<u64> {
        self.get_calls.lock().unwrap().clone()
    }

    /// Branches passed to `list_by_target_branch`
    pub fn by_target_calls(&self) -> Vec<String> {
        self.by_target_calls.lock().unwrap().clone()
    }

    /// Branches passed to `list_by_source_branch`
    pub fn by_source_calls(&self) -> Vec<String> {
        self.by_source_calls.lock().unwrap().clone()
    }

    /// Total number of API-equivalent calls
    pub fn total_calls(&self) -> usize {
        self.get_calls.lock().unwrap().len()
            + self.by_target_calls.lock().unwrap().len()
            + self.by_source_calls.lock().unwrap().len()
            + *self.list_calls.lock().unwrap()
    }

    fn filtered(&self, state: StateFilter, keep: impl Fn(&MergeRequest) -> bool) -> Vec<MergeRequest> {
        self.requests
            .iter()
            .filter(|mr| state.matches(mr.state) && keep(mr))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl MergeRequestSource for MockSource {
    async fn get_merge_request(&self, iid: u64) -> Result<MergeRequest> {
        self.get_calls.lock().unwrap().push(iid);
        if let Some(msg) = self.error_on_get.lock().unwrap().clone() {
            return Err(Error::Platform(msg));
        }
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
        self.by_target_calls.lock().unwrap().push(branch.to_string());
        if let Some(msg) = self.error_on_target.lock().unwrap().get(branch) {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self.filtered(state, |mr| mr.target_branch == branch))
    }

    async fn list_by_source_branch(
        &self,
        branch: &str,
        state: StateFilter,
    ) -> Result<Vec<MergeRequest>> {
        self.by_source_calls.lock().unwrap().push(branch.to_string());
        if let Some(msg) = self.error_on_source.lock().unwrap().get(branch) {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self.filtered(state, |mr| mr.source_branch == branch))
    }

    async fn list_merge_requests(&self, state: StateFilter) -> Result<Vec<MergeRequest>> {
        *self.list_calls.lock().unwrap() += 1;
        Ok(self.filtered(state, |_| true))
    }

    async fn default_branch(&self) -> Result<String> {
        Ok(self.default_branch.clone())
    }

    fn project(&self) -> &ProjectRef {
        &self.project
    }
}
