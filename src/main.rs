//! mrchain - visualize chains of stacked GitLab merge requests

mod cli;

use anstream::eprintln;
use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::OutputFormat;
use cli::context::SourceOptions;
use cli::project::{ProjectAction, run_project};
use cli::show::{ShowOptions, run_show};
use cli::stacks::{StacksOptions, run_stacks};
use cli::style::Stylize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mrchain")]
#[command(version, about = "Visualize chains of stacked GitLab merge requests", long_about = None)]
struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project map file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the chain around one merge request
    Show {
        /// Merge request URL, `!iid` or iid
        target: String,

        #[command(flatten)]
        source: SourceOptions,

        /// How many steps to follow in each direction
        #[arg(long, value_name = "N")]
        max_depth: Option<usize>,

        /// Output format
        #[arg(long, short, value_enum, default_value_t)]
        format: OutputFormat,

        /// Leave a merge request out of diagram output (repeatable)
        #[arg(long, value_name = "IID")]
        hide: Vec<u64>,

        /// Write output to a file
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// List every stack based on the default branch
    Stacks {
        #[command(flatten)]
        source: SourceOptions,

        /// Base branch (defaults to the project's default branch)
        #[arg(long, value_name = "BRANCH")]
        default_branch: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value_t)]
        format: OutputFormat,

        /// Write output to a file
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Manage the project path to id map
    Project {
        #[command(subcommand)]
        command: ProjectCommands,
    },
}

#[derive(Subcommand)]
enum ProjectCommands {
    /// List mapped projects
    List,
    /// Print the id mapped to a project path
    Get {
        /// Project path (`group/repo`)
        path: String,
    },
    /// Map a project path to its numeric id
    Set {
        /// Project path (`group/repo`)
        path: String,
        /// Numeric project id
        id: u64,
        /// Replace an existing mapping without asking
        #[arg(long, short)]
        yes: bool,
    },
    /// Remove a project mapping
    Remove {
        /// Project path (`group/repo`)
        path: String,
    },
}

impl From<ProjectCommands> for ProjectAction {
    fn from(command: ProjectCommands) -> Self {
        match command {
            ProjectCommands::List => Self::List,
            ProjectCommands::Get { path } => Self::Get { path },
            ProjectCommands::Set { path, id, yes } => Self::Set { path, id, yes },
            ProjectCommands::Remove { path } => Self::Remove { path },
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "mr_chain=debug,mrchain=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let store = cli.store.as_deref();
    match cli.command {
        Commands::Show {
            target,
            source,
            max_depth,
            format,
            hide,
            output,
        } => {
            let options = ShowOptions {
                format,
                max_depth,
                hide,
                output,
            };
            run_show(&target, &source, &options, store).await?;
        }
        Commands::Stacks {
            source,
            default_branch,
            format,
            output,
        } => {
            let options = StacksOptions {
                default_branch,
                format,
                output,
            };
            run_stacks(&source, &options, store).await?;
        }
        Commands::Project { command } => run_project(command.into(), store)?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Dropping the command future cancels any in-flight walk
    let result = tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => {
            eprintln!("{}", "Interrupted".warn());
            return ExitCode::from(130);
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".error());
            ExitCode::FAILURE
        }
    }
}
