//! Activity log commands for the active project.

use clap::Subcommand;
use labeltimer_core::{format_clock, LogEntry};

use super::{open, require_active};

#[derive(Subcommand)]
pub enum LogAction {
    /// List every entry of the active project's log
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a log entry by ID
    Delete {
        /// Entry ID
        id: u64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
}

pub(crate) fn print_entries(entries: &[&LogEntry], json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }
    if entries.is_empty() {
        println!("No entries.");
        return Ok(());
    }
    for entry in entries {
        println!(
            "{}  {}  {:>8}  {}  {}",
            entry.id,
            entry.timestamp.format("%Y-%m-%d %H:%M:%S"),
            format_clock(entry.time),
            entry.mode,
            entry.describe()
        );
    }
    Ok(())
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        LogAction::List { json } => {
            let app = open(false)?;
            let project = require_active(&app)?;
            let entries: Vec<&LogEntry> = project.log.iter().collect();
            print_entries(&entries, json)?;
        }
        LogAction::Delete { id, yes } => {
            let mut app = open(yes)?;
            require_active(&app)?;
            if app.session().and_then(|s| s.log().get(id)).is_none() {
                return Err(format!("log entry not found: {id}").into());
            }
            if app.delete_log_entry_confirmed(id) {
                println!("Entry deleted: {id}");
            } else {
                println!("cancelled");
            }
        }
    }
    Ok(())
}
