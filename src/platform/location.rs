//! Merge request references from URLs and command-line arguments

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

/// `/{project}[/-]/merge_requests/{iid}[/...]`
static MR_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/(?P<project>.+?)(?:/-)?/merge_requests/(?P<iid>\d+)(?:/.*)?$")
        .expect("merge request path pattern is valid")
});

/// Where a merge request page lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRequestLocation {
    /// Scheme, host and port of the GitLab instance
    pub base_url: String,
    /// Full project path (`group/subgroup/repo`)
    pub project_path: String,
    /// Merge request number
    pub iid: u64,
}

/// Parse a merge request page URL
///
/// Accepts both `…/group/repo/-/merge_requests/12` and the older
/// `…/group/repo/merge_requests/12`, with or without a trailing tab such as
/// `/diffs`.
pub fn parse_merge_request_url(input: &str) -> Result<MergeRequestLocation> {
    let invalid = |reason: &str| Error::InvalidUrl {
        url: input.to_string(),
        reason: reason.to_string(),
    };

    let url = Url::parse(input).map_err(|e| invalid(&e.to_string()))?;
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }

    let captures = MR_PATH
        .captures(url.path())
        .ok_or_else(|| invalid("not a merge request page"))?;

    let iid = captures["iid"]
        .parse::<u64>()
        .map_err(|e| invalid(&e.to_string()))?;

    Ok(MergeRequestLocation {
        base_url: url.origin().ascii_serialization(),
        project_path: captures["project"].to_string(),
        iid,
    })
}

/// A merge request named on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeRequestTarget {
    /// Full page URL (carries host and project)
    Url(MergeRequestLocation),
    /// Bare number (`123` or `!123`); project comes from elsewhere
    Iid(u64),
}

impl MergeRequestTarget {
    /// Parse a URL, `!123` or `123`
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.contains("://") {
            return parse_merge_request_url(trimmed).map(Self::Url);
        }

        trimmed
            .strip_prefix('!')
            .unwrap_or(trimmed)
            .parse::<u64>()
            .map(Self::Iid)
            .map_err(|_| Error::InvalidTarget(input.to_string()))
    }

    /// Merge request number
    pub const fn iid(&self) -> u64 {
        match self {
            Self::Url(location) => location.iid,
            Self::Iid(iid) => *iid,
        }
    }
}
