//! Shared command context for CLI commands
//!
//! Extracts the setup shared by `show` and `stacks`: settings, the project
//! map, and the merge request source.

use clap::Args;
use mr_chain::config::{Settings, SettingsOverrides};
use mr_chain::error::{Error, Result};
use mr_chain::platform::{
    FixtureSource, GitLabService, MergeRequestLocation, MergeRequestSource, MergeRequestTarget,
};
use mr_chain::store::{ProjectMap, default_store_path, load_project_map, save_project_map};
use mr_chain::types::{ProjectRef, StateFilter};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Flags selecting where merge requests come from
#[derive(Debug, Clone, Default, Args)]
pub struct SourceOptions {
    /// Project id or path (`group/repo`)
    #[arg(long, short)]
    pub project: Option<String>,

    /// GitLab host or base URL [env: GITLAB_HOST]
    #[arg(long)]
    pub host: Option<String>,

    /// Read merge requests from a JSON file instead of the API
    #[arg(long, value_name = "FILE")]
    pub fixture: Option<PathBuf>,

    /// Pause between API calls, in milliseconds
    #[arg(long, value_name = "MS")]
    pub delay_ms: Option<u64>,

    /// Merge request state to consider (opened, merged, closed, all)
    #[arg(long)]
    pub state: Option<StateFilter>,
}

/// Shared context for commands that read merge requests
pub struct CommandContext {
    /// Where merge requests come from
    pub source: Box<dyn MergeRequestSource>,
    /// Resolved settings
    pub settings: Settings,
}

impl CommandContext {
    /// Create a new command context
    ///
    /// A page URL supplies host and project unless flags override them. A
    /// numeric `--project` given alongside a URL is remembered in the
    /// project map so later runs can use the URL alone.
    pub fn new(
        options: &SourceOptions,
        max_depth: Option<usize>,
        target: Option<&MergeRequestTarget>,
        store: Option<&Path>,
    ) -> Result<Self> {
        let location = match target {
            Some(MergeRequestTarget::Url(location)) => Some(location),
            _ => None,
        };

        let overrides = SettingsOverrides {
            host: options
                .host
                .clone()
                .or_else(|| location.map(|l| l.base_url.clone())),
            max_depth,
            delay_ms: options.delay_ms,
            state: options.state,
        };
        let settings = Settings::resolve(&overrides)?;

        if let Some(fixture) = &options.fixture {
            debug!("Reading merge requests from {}", fixture.display());
            let source = FixtureSource::load(fixture)?;
            return Ok(Self {
                source: Box::new(source),
                settings,
            });
        }

        let store_path = store.map(Path::to_path_buf).or_else(default_store_path);
        let project = resolve_project(options.project.as_deref(), location, store_path.as_deref())?;
        debug!("Using project {project} on {}", settings.host);

        let source = GitLabService::new(Some(&settings.host), project, settings.token.clone())?;
        Ok(Self {
            source: Box::new(source),
            settings,
        })
    }
}

/// Pick the project from the flag, the project map, or the URL path
fn resolve_project(
    explicit: Option<&str>,
    location: Option<&MergeRequestLocation>,
    store_path: Option<&Path>,
) -> Result<ProjectRef> {
    let map = match store_path {
        Some(path) => load_project_map(path)?,
        None => ProjectMap::new(),
    };

    if let Some(explicit) = explicit {
        let project = ProjectRef::parse(explicit);
        if let (ProjectRef::Id(id), Some(location), Some(path)) = (&project, location, store_path) {
            remember(map, path, &location.project_path, *id);
        }
        return Ok(project);
    }

    let location = location.ok_or(Error::MissingProject)?;
    Ok(map
        .get(&location.project_path)
        .map_or_else(|| ProjectRef::Path(location.project_path.clone()), ProjectRef::Id))
}

/// Store `project_path → id`; failures only cost the shortcut next time
fn remember(mut map: ProjectMap, store_path: &Path, project_path: &str, id: u64) {
    if map.get(project_path) == Some(id) {
        return;
    }
    map.set(project_path, id);
    match save_project_map(store_path, &map) {
        Ok(()) => debug!("Mapped {project_path} to project {id}"),
        Err(e) => warn!("Could not save project mapping: {e}"),
    }
}
