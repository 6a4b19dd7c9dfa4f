//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips the escape codes when stdout
//! is not a color-capable terminal.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use supports_hyperlinks::Stream;
use terminal_link::Link;

/// Check mark used in success lines
pub const CHECK: &str = "✓";

/// Semantic colors for CLI output
pub trait Stylize {
    /// Headings and labels
    fn emphasis(&self) -> String;
    /// Secondary information
    fn muted(&self) -> String;
    /// Names and numbers worth spotting
    fn accent(&self) -> String;
    /// Completed actions
    fn success(&self) -> String;
    /// Degraded results
    fn warn(&self) -> String;
    /// Failures
    fn error(&self) -> String;
}

impl<T: std::fmt::Display> Stylize for T {
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    fn error(&self) -> String {
        self.red().bold().to_string()
    }
}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Dimmed arrow for branch relations
pub fn arrow() -> String {
    "→".muted()
}

/// Spinner style for network waits
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}

/// `text` as a terminal hyperlink to `url` when the terminal supports it
pub fn hyperlink(text: &str, url: &str) -> String {
    let linkable = url.starts_with("http://") || url.starts_with("https://");
    if linkable && supports_hyperlinks::on(Stream::Stdout) {
        Link::new(text, url).to_string()
    } else {
        text.to_string()
    }
}
