//! CSV export of the label timeline.
//!
//! Every field is double-quoted with inner quotes doubled; rows end in `\n`.

use chrono::NaiveDate;

use crate::activity::{LogAction, LogEntry};
use crate::format::format_clock;

const HEADER: [&str; 7] = [
    "Timestamp",
    "Time (seconds)",
    "Time (formatted)",
    "Emoji",
    "Label",
    "Mode",
    "Timer Kind",
];

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn push_row<I, T>(out: &mut String, fields: I)
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let row: Vec<String> = fields.into_iter().map(|f| quote(f.as_ref())).collect();
    out.push_str(&row.join(","));
    out.push('\n');
}

/// Render labels as CSV. Returns `None` when there is nothing to export.
///
/// Entries that are not labels are skipped, so the full log can be passed.
pub fn labels_to_csv<'a, I>(entries: I) -> Option<String>
where
    I: IntoIterator<Item = &'a LogEntry>,
{
    let mut out = String::new();
    push_row(&mut out, HEADER);

    let mut rows = 0usize;
    for entry in entries {
        let LogAction::LabelAdded { emoji, text } = &entry.action else {
            continue;
        };
        push_row(
            &mut out,
            [
                entry
                    .timestamp
                    .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                entry.time.to_string(),
                format_clock(entry.time),
                emoji.clone(),
                text.clone(),
                entry.mode.to_string(),
                entry.timer_kind.to_string(),
            ],
        );
        rows += 1;
    }

    (rows > 0).then_some(out)
}

/// `{project}_labels_{YYYY-MM-DD}.csv`, with `timer` when no project is active.
///
/// The project name is reduced to a single path component: separators,
/// characters reserved on common filesystems and leading dots are replaced.
pub fn export_filename(project_name: Option<&str>, date: NaiveDate) -> String {
    let base = project_name
        .map(filename_component)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "timer".to_string());
    format!("{base}_labels_{}.csv", date.format("%Y-%m-%d"))
}

fn filename_component(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    replaced.trim_start_matches('.').to_string()
}
