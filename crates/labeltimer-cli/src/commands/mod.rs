pub mod config;
pub mod export;
pub mod label;
pub mod log;
pub mod project;
pub mod run;
pub mod stats;

use std::error::Error;
use std::io::{BufRead, Write};
use std::path::PathBuf;

use labeltimer_core::storage::NotificationsConfig;
use labeltimer_core::{
    Config, Coordinator, Database, ExportSink, Headless, Notifier, Ports, Project, Prompter,
};

/// kv key holding the id of the project the last command left active.
pub const ACTIVE_PROJECT_KEY: &str = "activeProject";

pub type App = Coordinator<Database>;

/// Status messages go to stderr so stdout stays machine-readable.
pub struct TerminalNotifier {
    enabled: bool,
}

impl From<&NotificationsConfig> for TerminalNotifier {
    fn from(cfg: &NotificationsConfig) -> Self {
        Self {
            enabled: cfg.enabled,
        }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str) {
        if self.enabled {
            eprintln!("{message}");
        }
    }
}

pub struct TerminalPrompter {
    assume_yes: bool,
}

impl TerminalPrompter {
    fn read_line(question: &str) -> Option<String> {
        eprint!("{question} ");
        std::io::stderr().flush().ok()?;
        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn prompt_text(&self, description: &str) -> Option<String> {
        Self::read_line(&format!("{description}:")).filter(|s| !s.is_empty())
    }

    fn confirm(&self, entity: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        Self::read_line(&format!("Delete {entity}? [y/N]"))
            .is_some_and(|answer| matches!(answer.to_lowercase().as_str(), "y" | "yes"))
    }
}

/// Writes exported files into a directory.
pub struct FileExportSink {
    dir: PathBuf,
}

impl FileExportSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl ExportSink for FileExportSink {
    fn export_file(&self, bytes: &[u8], filename: &str) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.dir.join(filename), bytes)
    }
}

/// Open the database and config and restore the last active project.
pub fn open(assume_yes: bool) -> Result<App, Box<dyn Error>> {
    open_with(assume_yes, Box::new(Headless))
}

pub fn open_with(assume_yes: bool, exporter: Box<dyn ExportSink>) -> Result<App, Box<dyn Error>> {
    let config = Config::load()?;
    let db = Database::open()?;
    let preferred = db
        .kv_get(ACTIVE_PROJECT_KEY)?
        .and_then(|raw| raw.parse::<u64>().ok());
    let ports = Ports {
        notifier: Box::new(TerminalNotifier::from(&config.notifications)),
        prompter: Box::new(TerminalPrompter { assume_yes }),
        exporter,
    };
    Ok(Coordinator::with_active(db, config.timer, ports, preferred))
}

/// Record the coordinator's active project for the next invocation.
pub fn remember_active(app: &App) -> Result<(), Box<dyn Error>> {
    let db = app.storage();
    match app.active_project() {
        Some(project) => db.kv_set(ACTIVE_PROJECT_KEY, &project.id.to_string())?,
        None => db.kv_delete(ACTIVE_PROJECT_KEY)?,
    }
    Ok(())
}

pub fn require_active(app: &App) -> Result<&Project, Box<dyn Error>> {
    app.active_project()
        .ok_or_else(|| "no project selected; create one with `labeltimer project create <NAME>`".into())
}
