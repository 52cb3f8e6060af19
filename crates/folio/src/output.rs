//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.
//! Status lines (notifications, pagination, placeholder warnings) go to
//! stderr so stdout stays machine-readable.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use tabled::{Table, Tabled, settings::Style};
use tokio::sync::broadcast;

use folio_core::{Level, Notification, Pagination};

use crate::cli::OutputFormat;

// ── Color helpers ────────────────────────────────────────────────────

/// Color stderr status lines only on an interactive terminal without NO_COLOR.
pub fn should_color() -> bool {
    io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
pub fn render_list<T, R>(
    format: &OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            render_table(&rows)
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => data.iter().map(&id_fn).collect::<Vec<_>>().join("\n"),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses `detail_fn`, since single-item views are key/value
/// listings rather than `Tabled` rows.
pub fn render_single<T>(
    format: &OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> String
where
    T: serde::Serialize + ?Sized,
{
    match format {
        OutputFormat::Table => detail_fn(data),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => id_fn(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

// ── Status lines (stderr) ────────────────────────────────────────────

/// Print a one-line status message to stderr unless quiet.
pub fn status(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("{message}");
    }
}

/// Warn that the data shown is placeholder content.
pub fn placeholder_warning(reason: &str, quiet: bool) {
    if quiet {
        return;
    }
    let line = format!("API unavailable ({reason}); showing placeholder content");
    if should_color() {
        eprintln!("{}", line.yellow());
    } else {
        eprintln!("{line}");
    }
}

/// Page footer for table output.
pub fn pagination_footer(format: &OutputFormat, pagination: Option<&Pagination>, quiet: bool) {
    if quiet || !matches!(format, OutputFormat::Table) {
        return;
    }
    if let Some(p) = pagination {
        eprintln!("Page {}/{} ({} total)", p.page, p.pages.max(1), p.total);
    }
}

/// Drain pending success notifications; errors surface through the
/// returned `CliError` instead.
pub fn print_notifications(rx: &mut broadcast::Receiver<Notification>, quiet: bool) {
    while let Ok(note) = rx.try_recv() {
        if quiet || note.level != Level::Success {
            continue;
        }
        if should_color() {
            eprintln!("{} {}", "✓".green(), note.message);
        } else {
            eprintln!("✓ {}", note.message);
        }
    }
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: serde::Serialize + ?Sized>(data: &T, compact: bool) -> String {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.unwrap_or_else(|e| format!("{{\"error\": \"serialization failed: {e}\"}}"))
}

fn render_yaml<T: serde::Serialize + ?Sized>(data: &T) -> String {
    serde_yaml::to_string(data).unwrap_or_else(|e| format!("error: serialization failed: {e}"))
}
