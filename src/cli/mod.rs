//! Command implementations for the `mrchain` binary

pub mod context;
pub mod project;
pub mod show;
pub mod stacks;
pub mod style;

use async_trait::async_trait;
use clap::ValueEnum;
use indicatif::ProgressBar;
use mr_chain::error::Result;
use mr_chain::fetch::ProgressCallback;
use std::path::Path;
use std::time::Duration;
use style::spinner_style;
use tracing::debug;

/// Output format for `show` and `stacks`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Tree,
    /// Mermaid flowchart definition
    Mermaid,
    /// Mermaid flowchart in a fenced Markdown block
    Markdown,
    /// Machine-readable JSON
    Json,
}

/// Spinner-backed progress for network walks
pub struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    /// Start a spinner with an initial message
    pub fn spinner(message: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    /// Remove the spinner line
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

#[async_trait]
impl ProgressCallback for CliProgress {
    async fn on_message(&self, message: &str) {
        debug!("{message}");
        self.spinner.set_message(message.to_string());
    }
}

/// Write rendered output to `path`
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content)?;
    Ok(())
}
