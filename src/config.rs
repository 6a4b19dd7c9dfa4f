//! Runtime settings
//!
//! Values come from command-line flags first, then the environment, then
//! built-in defaults.

use crate::chain::DEFAULT_MAX_DEPTH;
use crate::error::{Error, Result};
use crate::types::StateFilter;
use std::time::Duration;

/// Environment variable naming the GitLab host
pub const HOST_ENV: &str = "GITLAB_HOST";

/// Environment variable holding an optional API token
pub const TOKEN_ENV: &str = "GITLAB_TOKEN";

/// Default host when neither flag nor environment names one
pub const DEFAULT_HOST: &str = "gitlab.com";

/// Default pause between successive API calls
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(200);

/// Settings shared by the chain commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// GitLab host or base URL
    pub host: String,
    /// API token sent as `PRIVATE-TOKEN`, if any
    pub token: Option<String>,
    /// Traversal depth bound
    pub max_depth: usize,
    /// Minimum delay between API calls
    pub request_delay: Duration,
    /// State filter for candidate lookups
    pub state: StateFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            token: None,
            max_depth: DEFAULT_MAX_DEPTH,
            request_delay: DEFAULT_REQUEST_DELAY,
            state: StateFilter::Opened,
        }
    }
}

/// Command-line overrides; `None` means "not given"
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    /// `--host`
    pub host: Option<String>,
    /// `--max-depth`
    pub max_depth: Option<usize>,
    /// `--delay-ms`
    pub delay_ms: Option<u64>,
    /// `--state`
    pub state: Option<StateFilter>,
}

impl Settings {
    /// Resolve settings from overrides and the process environment
    pub fn resolve(overrides: &SettingsOverrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve settings with an explicit environment lookup
    pub fn resolve_with(
        overrides: &SettingsOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let defaults = Self::default();
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let max_depth = overrides.max_depth.unwrap_or(defaults.max_depth);
        if max_depth == 0 {
            return Err(Error::Config(format!(
                "max depth must be a positive integer, got {max_depth}"
            )));
        }

        Ok(Self {
            host: non_empty(overrides.host.clone())
                .or_else(|| non_empty(env(HOST_ENV)))
                .unwrap_or(defaults.host),
            token: non_empty(env(TOKEN_ENV)),
            max_depth,
            request_delay: overrides
                .delay_ms
                .map_or(defaults.request_delay, Duration::from_millis),
            state: overrides.state.unwrap_or(defaults.state),
        })
    }
}
