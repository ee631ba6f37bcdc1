//! Project management commands for CLI.

use clap::Subcommand;

use super::{open, remember_active};

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a new project and make it active
    Create {
        /// Project name (2-50 characters, unique ignoring case)
        name: Option<String>,
    },
    /// List all projects
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Make a project the active one
    Select {
        /// Project ID
        id: u64,
    },
    /// Delete a project and its log
    Delete {
        /// Project ID
        id: u64,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Show a project with its full log
    Show {
        /// Project ID (defaults to the active project)
        id: Option<u64>,
    },
}

pub fn run(action: ProjectAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ProjectAction::Create { name } => {
            let mut app = open(false)?;
            let id = match name {
                Some(name) => app.create_project(&name)?,
                None => match app.create_project_interactive()? {
                    Some(id) => id,
                    None => {
                        println!("cancelled");
                        return Ok(());
                    }
                },
            };
            remember_active(&app)?;
            println!("Project created: {id}");
        }
        ProjectAction::List { json } => {
            let app = open(false)?;
            if json {
                println!("{}", serde_json::to_string_pretty(app.projects())?);
                return Ok(());
            }
            if app.projects().is_empty() {
                println!("No projects yet.");
                return Ok(());
            }
            let active = app.active_project().map(|p| p.id);
            for project in app.projects() {
                let marker = if Some(project.id) == active { "*" } else { " " };
                println!(
                    "{marker} {}  {}  ({} entries, created {})",
                    project.id,
                    project.name,
                    project.log.len(),
                    project.created_at.format("%Y-%m-%d")
                );
            }
        }
        ProjectAction::Select { id } => {
            let mut app = open(false)?;
            app.select_project(id)?;
            remember_active(&app)?;
            println!("Active project: {id}");
        }
        ProjectAction::Delete { id, yes } => {
            let mut app = open(yes)?;
            if app.projects().iter().all(|p| p.id != id) {
                return Err(format!("project not found: {id}").into());
            }
            if !app.delete_project_confirmed(id) {
                println!("cancelled");
                return Ok(());
            }
            remember_active(&app)?;
            println!("Project deleted: {id}");
        }
        ProjectAction::Show { id } => {
            let app = open(false)?;
            let project = match id {
                Some(id) => app.projects().iter().find(|p| p.id == id),
                None => app.active_project(),
            };
            match project {
                Some(project) => println!("{}", serde_json::to_string_pretty(project)?),
                None => return Err("project not found".into()),
            }
        }
    }
    Ok(())
}
