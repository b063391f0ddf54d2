//! HTML rendering.

use std::fmt::Write as _;

use autotask_tools::{FileQuery, TimeQuery};
use autotask_types::{FileEntry, FileListing, TimeReading};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::pages::{FilesOutcome, TimeOutcome};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 2rem auto; max-width: 60rem; padding: 0 1rem; color: #262730; }
nav a { margin-right: 1rem; }
form { display: grid; gap: 0.75rem; margin: 1.5rem 0; padding: 1rem; border: 1px solid #e6e9ef; border-radius: 0.5rem; }
label { display: grid; gap: 0.25rem; font-weight: 600; }
label.check { display: flex; gap: 0.5rem; align-items: center; }
small { color: #808495; font-weight: normal; }
input[type=text] { padding: 0.4rem; }
button { justify-self: start; padding: 0.4rem 1rem; }
.panel { padding: 0.75rem 1rem; border-radius: 0.5rem; margin: 0.5rem 0; }
.success { background: #dff5e3; }
.info { background: #e1ecfb; }
.error { background: #fde4e4; }
table { border-collapse: collapse; width: 100%; }
th, td { text-align: left; padding: 0.3rem 0.6rem; border-bottom: 1px solid #e6e9ef; }
"#;

fn layout(title: &str, icon: &str, subtitle: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
<nav><a href=\"/time\">Time</a><a href=\"/files\">Files</a></nav>\n\
<h1>{title} {icon}</h1>\n<p>{subtitle}</p>\n{body}\n<hr>\n<footer>Made with ❤️ using AutoTask</footer>\n</body>\n</html>\n",
        title = text(title),
    )
}

fn panel(class: &str, content: &str) -> String {
    format!("<div class=\"panel {class}\">{}</div>\n", text(content))
}

fn text_input(label: &str, name: &str, value: &str, help: &str) -> String {
    format!(
        "<label>{}<input type=\"text\" name=\"{name}\" value=\"{}\"><small>{}</small></label>\n",
        text(label),
        attr(value),
        text(help)
    )
}

fn checkbox(label: &str, name: &str, checked: bool) -> String {
    let checked = if checked { " checked" } else { "" };
    format!(
        "<label class=\"check\"><input type=\"checkbox\" name=\"{name}\" value=\"true\"{checked}>{}</label>\n",
        text(label)
    )
}

/// Time page, optionally with the outcome of a submission.
pub(crate) fn time_page(query: &TimeQuery, outcome: Option<&TimeOutcome>) -> String {
    let mut body = String::from("<form method=\"post\" action=\"/time\">\n");
    body.push_str(&text_input(
        "Time Format",
        "format_string",
        &query.format_string,
        "Enter time format (e.g., %Y-%m-%d %H:%M:%S)",
    ));
    body.push_str(&text_input(
        "Timezone",
        "timezone",
        &query.timezone,
        "Enter timezone (e.g., UTC, America/New_York, Asia/Shanghai)",
    ));
    body.push_str("<button type=\"submit\">Get Current Time</button>\n</form>\n");

    match outcome {
        None => {}
        Some(TimeOutcome::Success(reading)) => body.push_str(&time_result(query, reading)),
        Some(TimeOutcome::Failed { error }) => {
            body.push_str(&panel("error", "Failed to get current time"));
            if let Some(error) = error {
                body.push_str(&panel("error", &format!("Error: {error}")));
            }
        }
        Some(TimeOutcome::Fault(message)) => body.push_str(&panel("error", &format!("Operation failed: {message}"))),
    }

    layout(
        "Time Display Demo",
        "⏰",
        "Display current time in different formats and timezones",
        &body,
    )
}

fn time_result(query: &TimeQuery, reading: &TimeReading) -> String {
    let mut html = panel("success", "Current Time:");
    let _ = writeln!(html, "<h2 class=\"time\">{}</h2>", text(&reading.time));
    html.push_str(&panel("info", &format!("Format: {}", query.format_string)));
    let timezone = reading.timezone.as_deref().unwrap_or(&query.timezone);
    html.push_str(&panel("info", &format!("Timezone: {timezone}")));
    if let Some(timestamp) = &reading.timestamp {
        html.push_str(&panel("info", &format!("Timestamp: {timestamp}")));
    }
    if let Some(iso) = &reading.iso {
        html.push_str(&panel("info", &format!("ISO 8601: {iso}")));
    }
    html
}

/// File browser page, optionally with the outcome of a submission.
pub(crate) fn files_page(query: &FileQuery, outcome: Option<&FilesOutcome>) -> String {
    let mut body = String::from("<form method=\"post\" action=\"/files\">\n");
    body.push_str(&text_input("Directory", "directory", &query.directory, "Directory to list"));
    body.push_str(&text_input(
        "Pattern",
        "pattern",
        &query.pattern,
        "Glob pattern for file names (e.g., *.txt)",
    ));
    body.push_str(&checkbox("Include directories", "include_dirs", query.include_dirs));
    body.push_str(&checkbox("Recursive", "recursive", query.recursive));
    body.push_str("<button type=\"submit\">List Files</button>\n</form>\n");

    match outcome {
        None => {}
        Some(FilesOutcome::Success(listing)) => body.push_str(&file_result(listing)),
        Some(FilesOutcome::Failed { error }) => {
            body.push_str(&panel("error", "Failed to list files"));
            if let Some(error) = error {
                body.push_str(&panel("error", &format!("Error: {error}")));
            }
        }
        Some(FilesOutcome::Fault(message)) => body.push_str(&panel("error", &format!("Operation failed: {message}"))),
    }

    layout("File Browser Demo", "📁", "Browse files through the AutoTask node service", &body)
}

fn file_result(listing: &FileListing) -> String {
    let mut html = String::new();
    if let Some(reason) = &listing.parse_error {
        html.push_str(&panel("error", &format!("Failed to parse file list: {reason}")));
    }
    let count = listing.entries.len();
    let noun = if count == 1 { "entry" } else { "entries" };
    html.push_str(&panel("success", &format!("Found {count} {noun}")));
    html.push_str("<table>\n<thead><tr><th>Name</th><th>Path</th><th>Type</th><th>Size</th></tr></thead>\n<tbody>");
    for entry in &listing.entries {
        html.push_str(&file_row(entry));
    }
    html.push_str("</tbody>\n</table>\n");
    html
}

fn file_row(entry: &FileEntry) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
        text(&entry.name),
        text(&entry.path),
        text(&entry.kind),
        text(&entry.size_display())
    )
}
