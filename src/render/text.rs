//! Plain-text chain listing
//!
//! Used for `--format tree` when writing to a file and as the building
//! blocks of the colored terminal output.

use crate::chain::Direction;
use crate::fetch::{ChainReport, LookupStatus};
use crate::types::MergeRequest;
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Longest title shown before truncation
pub const TITLE_WIDTH: usize = 60;

/// Shorten `text` to at most `max` characters, marking the cut with `...`
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// Coarse "3 days ago" style age of `then` relative to `now`
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }

    let (count, unit) = match seconds {
        s if s < 3_600 => (s / 60, "minute"),
        s if s < 86_400 => (s / 3_600, "hour"),
        s if s < 604_800 => (s / 86_400, "day"),
        s if s < 2_592_000 => (s / 604_800, "week"),
        s if s < 31_536_000 => (s / 2_592_000, "month"),
        s => (s / 31_536_000, "year"),
    };
    let plural = if count > 1 { "s" } else { "" };
    format!("{count} {unit}{plural} ago")
}

/// `● !102 Title  feature-a-tests → feature-a  (2 days ago)`
pub fn mr_line(mr: &MergeRequest, now: DateTime<Utc>) -> String {
    let mut line = format!(
        "{} {} {}  {} → {}",
        mr.state.icon(),
        mr.reference(),
        truncate(&mr.title, TITLE_WIDTH),
        mr.source_branch,
        mr.target_branch
    );
    if mr.draft {
        line.push_str("  [draft]");
    }
    if let Some(updated) = mr.updated_at {
        let _ = write!(line, "  ({})", time_ago(updated, now));
    }
    line
}

/// Message shown in place of an empty or incomplete section
///
/// "Nothing found" and "lookup failed" read differently so a failed lookup
/// is never mistaken for an empty chain.
pub const fn status_message(direction: Direction, status: LookupStatus) -> Option<&'static str> {
    match (direction, status) {
        (_, LookupStatus::Found) => None,
        (Direction::Parents, LookupStatus::NoneFound) => Some("No parent merge requests found"),
        (Direction::Children, LookupStatus::NoneFound) => Some("No child merge requests found"),
        (Direction::Parents, LookupStatus::Failed) => {
            Some("Parent lookup failed; parents could not be determined")
        }
        (Direction::Children, LookupStatus::Failed) => {
            Some("Child lookup failed; children could not be determined")
        }
        (Direction::Parents, LookupStatus::Partial) => {
            Some("Some parent lookups failed; list may be incomplete")
        }
        (Direction::Children, LookupStatus::Partial) => {
            Some("Some child lookups failed; list may be incomplete")
        }
    }
}

/// Full listing: parents (farthest first), current, children
pub fn render_report(report: &ChainReport, now: DateTime<Utc>) -> String {
    let chain = &report.chain;
    let mut out = String::new();

    let _ = writeln!(out, "Parents:");
    for mr in chain.parents.iter().rev() {
        let _ = writeln!(out, "  {}", mr_line(mr, now));
    }
    if let Some(msg) = status_message(Direction::Parents, report.parent_status()) {
        let _ = writeln!(out, "  {msg}");
    }

    let _ = writeln!(out, "Current:");
    let _ = writeln!(out, "> {}", mr_line(&chain.current, now));

    let _ = writeln!(out, "Children:");
    for mr in &chain.children {
        let _ = writeln!(out, "  {}", mr_line(mr, now));
    }
    if let Some(msg) = status_message(Direction::Children, report.child_status()) {
        let _ = writeln!(out, "  {msg}");
    }

    for failure in &report.failures {
        let _ = writeln!(
            out,
            "! {} lookup for '{}' failed: {}",
            failure.direction, failure.branch, failure.message
        );
    }

    out
}

/// Listing of default-branch stacks, base first
pub fn render_stacks(stacks: &[Vec<MergeRequest>], default_branch: &str, now: DateTime<Utc>) -> String {
    if stacks.is_empty() {
        return format!("No merge requests target {default_branch}\n");
    }

    let mut out = String::new();
    for (index, stack) in stacks.iter().enumerate() {
        let _ = writeln!(out, "Stack {} on {default_branch}:", index + 1);
        for (depth, mr) in stack.iter().enumerate() {
            let _ = writeln!(out, "{}{}", "  ".repeat(depth + 1), mr_line(mr, now));
        }
    }
    out
}
