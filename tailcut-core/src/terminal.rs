//! Terminal UI components and styling for tailcut.
//!
//! All output goes through the `log` facade at info level, so the same lines
//! land on the console and in the run log. Styling uses a small hierarchy of
//! indentation levels. Color is only used when stdout is a terminal and
//! `NO_COLOR` is unset; the run log encoder strips any styling that remains.

use console::style;
use log::info;
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use unicode_width::UnicodeWidthStr;

/// Visual hierarchy of the run output.
#[derive(Debug, Clone, Copy)]
pub enum OutputLevel {
    /// `===== PROCESSING =====`
    Section,
    /// `» Processing: a.webm`
    Subsection,
    /// Details under a file
    Progress,
    /// `label:   value` lines
    Status,
}

impl OutputLevel {
    fn indent(self) -> &'static str {
        match self {
            OutputLevel::Section => "",
            OutputLevel::Subsection => "  ",
            OutputLevel::Progress => "    ",
            OutputLevel::Status => "      ",
        }
    }
}

const LABEL_WIDTH: usize = 15;

#[derive(Debug, Clone, Copy)]
enum Tone {
    Plain,
    Strong,
    Heading,
    Good,
    Caution,
    Bad,
}

/// Color only for an interactive stdout without `NO_COLOR`.
fn color_enabled(no_color_set: bool, stdout_is_terminal: bool) -> bool {
    !no_color_set && stdout_is_terminal
}

fn use_color() -> bool {
    color_enabled(
        std::env::var_os("NO_COLOR").is_some(),
        std::io::stdout().is_terminal(),
    )
}

fn paint(text: &str, tone: Tone) -> String {
    if !use_color() {
        return text.to_string();
    }
    match tone {
        Tone::Plain => text.to_string(),
        Tone::Strong => style(text).bold().to_string(),
        Tone::Heading => text.cyan().to_string(),
        Tone::Good => text.green().to_string(),
        Tone::Caution => text.yellow().to_string(),
        Tone::Bad => text.red().bold().to_string(),
    }
}

/// Tone of a status value. Counters of failed or skipped files stand out
/// when non-zero.
fn status_tone(label: &str, value: &str, highlight: bool) -> Tone {
    match label {
        "Decoding" if value.starts_with("Hardware") => Tone::Good,
        "Failed" if value != "0" => Tone::Bad,
        "Skipped" if value != "0" => Tone::Caution,
        _ if highlight => Tone::Strong,
        _ => Tone::Plain,
    }
}

/// `===== TITLE =====` surrounded by blank lines.
pub fn print_section(title: &str) {
    info!("");
    info!("===== {} =====", paint(&title.to_uppercase(), Tone::Heading));
    info!("");
}

/// Print `text` at `level`, optionally behind a symbol.
pub fn print_item(level: OutputLevel, symbol: Option<&str>, text: &str, bold: bool) {
    let prefix = symbol.map(|sym| format!("{sym} ")).unwrap_or_default();
    let tone = if bold { Tone::Strong } else { Tone::Plain };
    info!("{}{prefix}{}", level.indent(), paint(text, tone));
}

/// Header line for one file.
pub fn print_processing(message: &str) {
    info!("");
    print_item(OutputLevel::Subsection, Some("»"), message, true);
}

pub fn print_sub_item(message: &str) {
    print_item(OutputLevel::Progress, None, message, false);
}

pub fn print_success(message: &str) {
    info!("  ✓ {}", paint(message, Tone::Good));
}

/// Formats a `label: value` line with the label padded to a fixed display width.
#[must_use]
pub fn format_status_line(label: &str, value: &str) -> String {
    let padding = LABEL_WIDTH.saturating_sub(label.width()).max(1);
    format!(
        "{}{label}:{}{value}",
        OutputLevel::Status.indent(),
        " ".repeat(padding)
    )
}

/// Key-value line; `highlight` makes the value bold.
pub fn print_status(label: &str, value: &str, highlight: bool) {
    let value = paint(value, status_tone(label, value, highlight));
    info!("{}", format_status_line(label, &value));
}

/// Error block with an optional hint on how to fix it.
pub fn print_error(title: &str, message: &str, suggestion: Option<&str>) {
    info!("  ✗ {}", paint(title, Tone::Bad));
    info!("    Message:    {message}");
    if let Some(hint) = suggestion {
        info!("    Suggestion: {hint}");
    }
}

pub fn print_warning(message: &str) {
    info!("  ⚠ {}", paint(message, Tone::Caution));
}
