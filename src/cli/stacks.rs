//! Stacks command - every chain rooted at the default branch

use crate::cli::context::{CommandContext, SourceOptions};
use crate::cli::show::emit;
use crate::cli::style::{Stylize, hyperlink};
use crate::cli::{CliProgress, OutputFormat};
use anstream::println;
use chrono::Utc;
use mr_chain::chain::linearize_from_default_branch;
use mr_chain::error::Result;
use mr_chain::render::text::{TITLE_WIDTH, render_stacks, truncate};
use mr_chain::render::{ChainView, to_mermaid, to_mermaid_markdown};
use mr_chain::types::MergeRequest;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Options for the stacks command
#[derive(Debug, Clone, Default)]
pub struct StacksOptions {
    /// Base branch; the project's default branch when unset
    pub default_branch: Option<String>,
    /// Output format
    pub format: OutputFormat,
    /// Write to this file instead of stdout
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct StacksJson<'a> {
    default_branch: &'a str,
    stacks: &'a [Vec<MergeRequest>],
}

/// Run the stacks command
pub async fn run_stacks(
    source: &SourceOptions,
    options: &StacksOptions,
    store: Option<&Path>,
) -> Result<()> {
    let ctx = CommandContext::new(source, None, None, store)?;

    let progress = CliProgress::spinner(&format!(
        "Listing merge requests of project {}...",
        ctx.source.project()
    ));
    let listed = async {
        let requests = ctx.source.list_merge_requests(ctx.settings.state).await?;
        let default_branch = match &options.default_branch {
            Some(branch) => branch.clone(),
            None => ctx.source.default_branch().await?,
        };
        Ok::<_, mr_chain::error::Error>((requests, default_branch))
    }
    .await;
    progress.finish();
    let (requests, default_branch) = listed?;

    let stacks = linearize_from_default_branch(&requests, &default_branch);

    let rendered = match options.format {
        OutputFormat::Tree if options.output.is_none() => {
            print_stacks(&stacks, &default_branch);
            return Ok(());
        }
        OutputFormat::Tree => render_stacks(&stacks, &default_branch, Utc::now()),
        OutputFormat::Mermaid => to_mermaid(&ChainView::stacks(stacks).diagram()),
        OutputFormat::Markdown => to_mermaid_markdown(&ChainView::stacks(stacks).diagram()),
        OutputFormat::Json => {
            let json = StacksJson {
                default_branch: &default_branch,
                stacks: &stacks,
            };
            format!("{}\n", serde_json::to_string_pretty(&json)?)
        }
    };

    emit(&rendered, options.output.as_deref())
}

fn print_stacks(stacks: &[Vec<MergeRequest>], default_branch: &str) {
    if stacks.is_empty() {
        println!(
            "{}",
            format!("No merge requests target {default_branch}").muted()
        );
        return;
    }

    for (index, stack) in stacks.iter().enumerate() {
        println!(
            "{} {}",
            format!("Stack {}", index + 1).emphasis(),
            format!("on {default_branch}").muted()
        );
        for (depth, mr) in stack.iter().enumerate() {
            println!(
                "{}{} {} {}",
                "  ".repeat(depth + 1),
                mr.state.icon(),
                hyperlink(&mr.reference(), &mr.web_url).accent(),
                truncate(&mr.title, TITLE_WIDTH)
            );
        }
    }
}
