//! Color and styling helpers for report output.
//!
//! Status colors, shared by the calendar bars and the digraph fills:
//!   - Done/Closed:           green   (lightgreen fill)
//!   - Closed Without Action: magenta (purple fill)
//!   - In Progress:           red     (pink fill)
//!   - In Queue:              yellow  (yellow fill)
//!   - Everything else:       light gray (white fill)

use crate::domain::IssueStatus;
use colored::{Color, Colorize};
use std::env;

/// Whether terminal output may use color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create an OutputConfig with an explicit setting.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Start from `use_colors` and switch colors off when the environment
    /// asks for it.
    ///
    /// Reads:
    /// - `NO_COLOR`: any value disables colors
    /// - `CADENCE_COLOR`: `0` or `false` disables colors
    pub fn from_env(use_colors: bool) -> Self {
        // https://no-color.org/
        let allowed = env::var("NO_COLOR").is_err()
            && env::var("CADENCE_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);
        Self {
            use_colors: use_colors && allowed,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { use_colors: true }
    }
}

/// Terminal color for a status.
pub fn terminal_color(status: IssueStatus) -> Color {
    match status {
        IssueStatus::Done | IssueStatus::Closed => Color::Green,
        IssueStatus::ClosedWithoutAction => Color::Magenta,
        IssueStatus::InProgress => Color::Red,
        IssueStatus::InQueue => Color::Yellow,
        _ => Color::White,
    }
}

/// Graphviz fill color for a status.
pub fn dot_fill(status: IssueStatus) -> &'static str {
    match status {
        IssueStatus::Done | IssueStatus::Closed => "lightgreen",
        IssueStatus::ClosedWithoutAction => "purple",
        IssueStatus::InProgress => "pink",
        IssueStatus::InQueue => "yellow",
        _ => "white",
    }
}

/// Apply semantic "warning" color (yellow) to text.
pub fn warning(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.yellow().to_string()
}

/// Apply semantic "success" color (green) to text.
pub fn success(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.green().to_string()
}

/// Dim text, for header rows.
pub fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::done(IssueStatus::Done, "lightgreen", Color::Green)]
    #[case::closed(IssueStatus::Closed, "lightgreen", Color::Green)]
    #[case::abandoned(IssueStatus::ClosedWithoutAction, "purple", Color::Magenta)]
    #[case::in_progress(IssueStatus::InProgress, "pink", Color::Red)]
    #[case::in_queue(IssueStatus::InQueue, "yellow", Color::Yellow)]
    #[case::backlog(IssueStatus::Backlog, "white", Color::White)]
    fn test_status_colors(#[case] status: IssueStatus, #[case] fill: &str, #[case] color: Color) {
        assert_eq!(dot_fill(status), fill);
        assert_eq!(terminal_color(status), color);
    }

    #[test]
    fn test_plain_config_leaves_text_alone() {
        let config = OutputConfig::new(false);
        assert_eq!(warning("careful", &config), "careful");
        assert_eq!(success("ok", &config), "ok");
        assert_eq!(dimmed("hdr", &config), "hdr");
    }
}
