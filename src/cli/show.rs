//! Show command - chain around one merge request

use crate::cli::context::{CommandContext, SourceOptions};
use crate::cli::style::{Stylize, arrow, check, hyperlink};
use crate::cli::{CliProgress, OutputFormat, write_output};
use anstream::{print, println};
use chrono::{DateTime, Utc};
use mr_chain::chain::Direction;
use mr_chain::error::Result;
use mr_chain::fetch::{ChainFetcher, ChainReport, ExpansionFailure, FetchOptions, LookupStatus};
use mr_chain::platform::MergeRequestTarget;
use mr_chain::render::text::{TITLE_WIDTH, render_report, status_message, time_ago, truncate};
use mr_chain::render::{ChainView, Diagram, to_mermaid, to_mermaid_markdown};
use mr_chain::types::{ChainResult, MergeRequest, MergeRequestState};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Options for the show command
#[derive(Debug, Clone, Default)]
pub struct ShowOptions {
    /// Output format
    pub format: OutputFormat,
    /// Depth bound per direction
    pub max_depth: Option<usize>,
    /// Merge requests left out of diagram output
    pub hide: Vec<u64>,
    /// Write to this file instead of stdout
    pub output: Option<PathBuf>,
}

#[derive(Serialize)]
struct ShowJson<'a> {
    chain: &'a ChainResult,
    failures: &'a [ExpansionFailure],
    parent_status: LookupStatus,
    child_status: LookupStatus,
    diagram: Diagram,
}

/// Run the show command
pub async fn run_show(
    target: &str,
    source: &SourceOptions,
    options: &ShowOptions,
    store: Option<&Path>,
) -> Result<()> {
    let target = MergeRequestTarget::parse(target)?;
    let ctx = CommandContext::new(source, options.max_depth, Some(&target), store)?;
    let iid = target.iid();

    let progress = CliProgress::spinner(&format!(
        "Fetching !{iid} from project {}...",
        ctx.source.project()
    ));
    let fetcher = ChainFetcher::new(ctx.source.as_ref(), FetchOptions::from(&ctx.settings))
        .with_progress(&progress);
    let report = fetcher.fetch(iid).await;
    progress.finish();
    let report = report?;

    let mut view = ChainView::report(&report);
    for &hidden in &options.hide {
        view.hide(hidden);
    }

    let now = Utc::now();
    let rendered = match options.format {
        OutputFormat::Tree if options.output.is_none() => {
            print_tree(&report, now);
            return Ok(());
        }
        OutputFormat::Tree => render_report(&report, now),
        OutputFormat::Mermaid => to_mermaid(&view.diagram()),
        OutputFormat::Markdown => to_mermaid_markdown(&view.diagram()),
        OutputFormat::Json => {
            let json = ShowJson {
                chain: &report.chain,
                failures: &report.failures,
                parent_status: report.parent_status(),
                child_status: report.child_status(),
                diagram: view.diagram(),
            };
            format!("{}\n", serde_json::to_string_pretty(&json)?)
        }
    };

    emit(&rendered, options.output.as_deref())
}

/// Print to stdout or write to `output`
pub fn emit(rendered: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            write_output(path, rendered)?;
            println!("{} Wrote {}", check(), path.display().accent());
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

fn print_tree(report: &ChainReport, now: DateTime<Utc>) {
    let chain = &report.chain;

    println!("{}", "Parents".emphasis());
    for mr in chain.parents.iter().rev() {
        println!("  {}", styled_line(mr, now));
    }
    print_status(Direction::Parents, report.parent_status());

    println!("{}", "Current".emphasis());
    println!("{} {}", ">".accent(), styled_line(&chain.current, now));

    println!("{}", "Children".emphasis());
    for mr in &chain.children {
        println!("  {}", styled_line(mr, now));
    }
    print_status(Direction::Children, report.child_status());

    for failure in &report.failures {
        println!(
            "{} {} lookup for '{}' failed: {}",
            "!".error(),
            failure.direction,
            failure.branch,
            failure.message.muted()
        );
    }
}

fn print_status(direction: Direction, status: LookupStatus) {
    if let Some(message) = status_message(direction, status) {
        let line = match status {
            LookupStatus::NoneFound => message.muted(),
            _ => message.warn(),
        };
        println!("  {line}");
    }
}

fn styled_line(mr: &MergeRequest, now: DateTime<Utc>) -> String {
    let icon = mr.state.icon().to_string();
    let icon = match mr.state {
        MergeRequestState::Opened => icon.success(),
        MergeRequestState::Merged => icon.accent(),
        MergeRequestState::Closed => icon.error(),
        MergeRequestState::Unknown => icon.muted(),
    };

    let mut line = format!(
        "{icon} {} {}  {} {} {}",
        hyperlink(&mr.reference(), &mr.web_url).accent(),
        truncate(&mr.title, TITLE_WIDTH),
        mr.source_branch.emphasis(),
        arrow(),
        mr.target_branch
    );
    if mr.draft {
        line.push_str(&format!("  {}", "[draft]".warn()));
    }
    if let Some(updated) = mr.updated_at {
        line.push_str(&format!("  {}", format!("({})", time_ago(updated, now)).muted()));
    }
    line
}
