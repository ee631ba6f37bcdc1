use clap::Subcommand;
use labeltimer_core::{LogEntry, CATALOG};

use super::log::print_entries;
use super::{open, require_active};

#[derive(Subcommand)]
pub enum LabelAction {
    /// List the labels recorded for the active project
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a label by ID
    Delete {
        /// Label entry ID
        id: u64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Show the quick-label options and their keys
    Options,
}

pub fn run(action: LabelAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        LabelAction::List { json } => {
            let app = open(false)?;
            let project = require_active(&app)?;
            let labels: Vec<&LogEntry> = project.log.iter().filter(|e| e.is_label()).collect();
            print_entries(&labels, json)?;
        }
        LabelAction::Delete { id, yes } => {
            let mut app = open(yes)?;
            require_active(&app)?;
            let is_label = app
                .session()
                .and_then(|s| s.log().get(id))
                .is_some_and(LogEntry::is_label);
            if !is_label {
                return Err(format!("label not found: {id}").into());
            }
            if app.delete_label_confirmed(id) {
                println!("Label deleted: {id}");
            } else {
                println!("cancelled");
            }
        }
        LabelAction::Options => {
            for option in CATALOG.iter() {
                println!("{}  {}  {}", option.key, option.emoji, option.text);
            }
        }
    }
    Ok(())
}
