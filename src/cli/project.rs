//! Project command - manage the project path to id map

use crate::cli::style::{Stylize, check};
use anstream::println;
use dialoguer::Confirm;
use mr_chain::error::{Error, Result};
use mr_chain::store::{default_store_path, load_project_map, save_project_map};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Project map operation
#[derive(Debug, Clone)]
pub enum ProjectAction {
    /// Print every mapping
    List,
    /// Print the id stored for a path
    Get {
        /// Project path
        path: String,
    },
    /// Store an id for a path
    Set {
        /// Project path
        path: String,
        /// Numeric project id
        id: u64,
        /// Replace an existing mapping without asking
        yes: bool,
    },
    /// Forget a path
    Remove {
        /// Project path
        path: String,
    },
}

fn store_path(store: Option<&Path>) -> Result<PathBuf> {
    store
        .map(Path::to_path_buf)
        .or_else(default_store_path)
        .ok_or_else(|| Error::Store("no config directory found; pass --store".to_string()))
}

/// Run the project command
pub fn run_project(action: ProjectAction, store: Option<&Path>) -> Result<()> {
    let path = store_path(store)?;
    let mut map = load_project_map(&path)?;

    match action {
        ProjectAction::List => {
            if map.is_empty() {
                println!("{}", "No projects mapped".muted());
                return Ok(());
            }
            for (project, id) in map.iter() {
                println!("{}  {}", project.emphasis(), id.accent());
            }
        }
        ProjectAction::Get { path: project } => {
            let id = map
                .get(&project)
                .ok_or_else(|| Error::Store(format!("no project id stored for '{project}'")))?;
            println!("{id}");
        }
        ProjectAction::Set {
            path: project,
            id,
            yes,
        } => {
            if let Some(existing) = map.get(&project).filter(|&existing| existing != id) {
                let interactive = std::io::stdin().is_terminal();
                if !yes && !interactive {
                    return Err(Error::Store(format!(
                        "'{project}' is already mapped to {existing}; pass --yes to replace it"
                    )));
                }
                if !yes
                    && !Confirm::new()
                        .with_prompt(format!("Replace {project} → {existing} with {id}?"))
                        .default(false)
                        .interact()
                        .map_err(|e| Error::Internal(format!("Failed to read confirmation: {e}")))?
                {
                    println!("{}", "Aborted".muted());
                    return Ok(());
                }
            }
            map.set(&project, id);
            save_project_map(&path, &map)?;
            println!("{} Mapped {} to {}", check(), project.emphasis(), id.accent());
        }
        ProjectAction::Remove { path: project } => {
            if map.remove(&project).is_none() {
                println!("{}", format!("'{project}' was not mapped").muted());
                return Ok(());
            }
            save_project_map(&path, &map)?;
            println!("{} Removed {}", check(), project.emphasis());
        }
    }

    Ok(())
}
