//! Remote chain walk - effectful counterpart of [`crate::chain`]
//!
//! Walks parents and children of one merge request through a
//! [`MergeRequestSource`], one branch lookup at a time. Direction semantics,
//! depth bound and cycle handling match [`crate::chain::build_chain`].
//!
//! The walk is a plain future: dropping it abandons the traversal and no
//! further requests are made.

mod throttle;

use crate::chain::{DEFAULT_MAX_DEPTH, Direction};
use crate::config::{DEFAULT_REQUEST_DELAY, Settings};
use crate::error::Result;
use crate::platform::MergeRequestSource;
use crate::types::{ChainResult, MergeRequest, StateFilter};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashSet;
use std::time::Duration;
use throttle::Throttle;
use tracing::{debug, warn};

/// Progress reporting for long-running walks
#[async_trait]
pub trait ProgressCallback: Send + Sync {
    /// Called with a human-readable status line
    async fn on_message(&self, message: &str);
}

/// Progress callback that discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl ProgressCallback for NoopProgress {
    async fn on_message(&self, _message: &str) {}
}

/// Options for a remote walk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Depth bound per direction
    pub max_depth: usize,
    /// Minimum delay between API calls
    pub request_delay: Duration,
    /// State filter for candidate lookups
    pub state: StateFilter,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            request_delay: DEFAULT_REQUEST_DELAY,
            state: StateFilter::Opened,
        }
    }
}

impl From<&Settings> for FetchOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            max_depth: settings.max_depth,
            request_delay: settings.request_delay,
            state: settings.state,
        }
    }
}

/// One candidate lookup that failed during the walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpansionFailure {
    /// Direction being walked
    pub direction: Direction,
    /// Branch whose candidates could not be fetched
    pub branch: String,
    /// Steps from the current merge request
    pub depth: usize,
    /// Error text
    pub message: String,
}

/// Outcome of one direction of the walk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupStatus {
    /// Merge requests found and every lookup succeeded
    Found,
    /// Every lookup succeeded and none matched
    NoneFound,
    /// Some merge requests found but at least one lookup failed
    Partial,
    /// Nothing found and at least one lookup failed
    Failed,
}

impl LookupStatus {
    const fn classify(found: usize, failures: usize) -> Self {
        match (found, failures) {
            (0, 0) => Self::NoneFound,
            (_, 0) => Self::Found,
            (0, _) => Self::Failed,
            _ => Self::Partial,
        }
    }
}

/// Result of a remote walk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainReport {
    /// The chain as far as it could be fetched
    pub chain: ChainResult,
    /// Lookups that failed and were treated as "no matches"
    pub failures: Vec<ExpansionFailure>,
}

impl ChainReport {
    /// Report for a chain resolved without any failed lookups
    pub const fn complete(chain: ChainResult) -> Self {
        Self {
            chain,
            failures: Vec::new(),
        }
    }

    /// Status of the parent lookups
    pub fn parent_status(&self) -> LookupStatus {
        self.status(Direction::Parents)
    }

    /// Status of the child lookups
    pub fn child_status(&self) -> LookupStatus {
        self.status(Direction::Children)
    }

    /// Whether every lookup succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    fn status(&self, direction: Direction) -> LookupStatus {
        let found = match direction {
            Direction::Parents => self.chain.parents.len(),
            Direction::Children => self.chain.children.len(),
        };
        let failures = self
            .failures
            .iter()
            .filter(|f| f.direction == direction)
            .count();
        LookupStatus::classify(found, failures)
    }
}

/// Walks a merge request chain through a [`MergeRequestSource`]
pub struct ChainFetcher<'a> {
    source: &'a dyn MergeRequestSource,
    options: FetchOptions,
    progress: &'a dyn ProgressCallback,
}

/// A discovered merge request waiting to be recorded and expanded
struct Pending {
    mr: MergeRequest,
    depth: usize,
}

impl<'a> ChainFetcher<'a> {
    /// Create a fetcher without progress reporting
    pub fn new(source: &'a dyn MergeRequestSource, options: FetchOptions) -> Self {
        Self {
            source,
            options,
            progress: &NoopProgress,
        }
    }

    /// Report progress through `progress`
    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn ProgressCallback) -> Self {
        self.progress = progress;
        self
    }

    /// Fetch merge request `iid` and walk its parents and children
    ///
    /// Fails only if `iid` itself cannot be fetched. Failed candidate
    /// lookups are logged, recorded in the report and walked past.
    pub async fn fetch(&self, iid: u64) -> Result<ChainReport> {
        let mut throttle = Throttle::new(self.options.request_delay);

        self.progress
            .on_message(&format!("Fetching merge request !{iid}"))
            .await;
        throttle.wait().await;
        let current = self.source.get_merge_request(iid).await?;

        let mut failures = Vec::new();
        let parents = self
            .walk(&current, Direction::Parents, &mut throttle, &mut failures)
            .await;
        let children = self
            .walk(&current, Direction::Children, &mut throttle, &mut failures)
            .await;

        debug!(
            mr_iid = iid,
            parents = parents.len(),
            children = children.len(),
            failures = failures.len(),
            "walked chain"
        );

        Ok(ChainReport {
            chain: ChainResult {
                current,
                parents,
                children,
            },
            failures,
        })
    }

    async fn walk(
        &self,
        current: &MergeRequest,
        direction: Direction,
        throttle: &mut Throttle,
        failures: &mut Vec<ExpansionFailure>,
    ) -> Vec<MergeRequest> {
        let mut visited: HashSet<String> =
            HashSet::from([direction.origin_branch(current).to_string()]);
        let mut found = Vec::new();
        let mut stack: Vec<Pending> = Vec::new();

        let start = direction.branch_of_interest(current).to_string();
        self.expand(&start, 0, direction, &mut visited, throttle, failures, &mut stack)
            .await;

        while let Some(Pending { mr, depth }) = stack.pop() {
            if mr.id == current.id {
                continue;
            }
            let next = direction.branch_of_interest(&mr).to_string();
            found.push(mr);
            self.expand(&next, depth, direction, &mut visited, throttle, failures, &mut stack)
                .await;
        }

        found
    }

    /// Look up candidates of `branch` and push them (nearest sibling on top)
    #[allow(clippy::too_many_arguments)]
    async fn expand(
        &self,
        branch: &str,
        depth: usize,
        direction: Direction,
        visited: &mut HashSet<String>,
        throttle: &mut Throttle,
        failures: &mut Vec<ExpansionFailure>,
        stack: &mut Vec<Pending>,
    ) {
        if depth >= self.options.max_depth || !visited.insert(branch.to_string()) {
            return;
        }

        self.progress
            .on_message(&format!("Looking up {direction} of {branch}"))
            .await;
        throttle.wait().await;

        let lookup = match direction {
            Direction::Parents => self
                .source
                .list_by_source_branch(branch, self.options.state)
                .await
                .map(|mut mrs| mrs.pop().into_iter().collect::<Vec<_>>()),
            Direction::Children => {
                self.source
                    .list_by_target_branch(branch, self.options.state)
                    .await
            }
        };

        match lookup {
            Ok(matches) => {
                debug!(%direction, branch, depth, count = matches.len(), "expanded branch");
                stack.extend(
                    matches
                        .into_iter()
                        .rev()
                        .map(|mr| Pending { mr, depth: depth + 1 }),
                );
            }
            Err(e) => {
                warn!(%direction, branch, depth, error = %e, "branch lookup failed");
                failures.push(ExpansionFailure {
                    direction,
                    branch: branch.to_string(),
                    depth,
                    message: e.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::FixtureSource;

    fn no_delay() -> FetchOptions {
        FetchOptions {
            request_delay: Duration::ZERO,
            ..FetchOptions::default()
        }
    }

    #[tokio::test]
    async fn test_fetch_matches_pure_resolution_on_sample() {
        let source = FixtureSource::sample().unwrap();
        let fetcher = ChainFetcher::new(&source, no_delay());

        let report = fetcher.fetch(101).await.unwrap();
        let expected = crate::chain::build_chain(
            &report.chain.current,
            source.requests(),
            DEFAULT_MAX_DEPTH,
        );

        assert_eq!(report.chain, expected);
        assert!(report.is_complete());
        assert_eq!(report.parent_status(), LookupStatus::NoneFound);
        assert_eq!(report.child_status(), LookupStatus::Found);
    }

    #[tokio::test]
    async fn test_missing_current_is_error() {
        let source = FixtureSource::sample().unwrap();
        let fetcher = ChainFetcher::new(&source, no_delay());

        assert!(fetcher.fetch(999).await.is_err());
    }

    #[test]
    fn test_lookup_status_classification() {
        assert_eq!(LookupStatus::classify(0, 0), LookupStatus::NoneFound);
        assert_eq!(LookupStatus::classify(2, 0), LookupStatus::Found);
        assert_eq!(LookupStatus::classify(0, 1), LookupStatus::Failed);
        assert_eq!(LookupStatus::classify(1, 1), LookupStatus::Partial);
    }
}
