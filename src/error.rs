//! Error types for mr-chain

use thiserror::Error;

/// Errors produced by the library
#[derive(Debug, Error)]
pub enum Error {
    /// GitLab API returned an error or an unexpected payload
    #[error("GitLab API error: {0}")]
    GitLabApi(String),

    /// The requested merge request does not exist (or is not visible)
    #[error("merge request !{0} not found")]
    MergeRequestNotFound(u64),

    /// A merge request URL could not be parsed
    #[error("invalid merge request URL '{url}': {reason}")]
    InvalidUrl {
        /// URL as given
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// A command-line target was neither a URL nor a merge request number
    #[error("invalid merge request reference '{0}' (expected a URL, '!123' or '123')")]
    InvalidTarget(String),

    /// No project could be determined for the request
    #[error("no project given; pass --project or a merge request URL")]
    MissingProject,

    /// Fixture file could not be loaded
    #[error("fixture error: {0}")]
    Fixture(String),

    /// Project map could not be read or written
    #[error("project store error: {0}")]
    Store(String),

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Config(String),

    /// Platform-level failure (mock sources, unsupported operations)
    #[error("platform error: {0}")]
    Platform(String),

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),

    /// HTTP transport error
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// JSON (de)serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;
