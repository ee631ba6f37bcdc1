//! Dashboard summary: counts only.

use serde::Serialize;

use crate::activity::LogEntry;
use crate::format::format_short;
use crate::labels::CATALOG;
use crate::project::Project;
use crate::session::Session;
use crate::timer::TimerState;

const RECENT_PROJECTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub key: &'static str,
    pub emoji: &'static str,
    pub text: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecentProject {
    pub id: u64,
    pub name: String,
    pub created: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dashboard {
    pub project_count: usize,
    pub active_project: Option<String>,
    pub state: TimerState,
    pub elapsed_display: String,
    pub label_count: usize,
    pub label_counts: Vec<LabelCount>,
    /// The last three projects in persisted order.
    pub recent_projects: Vec<RecentProject>,
}

impl Dashboard {
    pub fn build(projects: &[Project], session: Option<&Session>) -> Self {
        let labels: Vec<&LogEntry> = session.map(Session::labels).unwrap_or_default();
        let label_counts = CATALOG
            .iter()
            .map(|opt| LabelCount {
                key: opt.key,
                emoji: opt.emoji,
                text: opt.text,
                count: labels
                    .iter()
                    .filter(|e| e.emoji() == Some(opt.emoji))
                    .count(),
            })
            .collect();

        let skip = projects.len().saturating_sub(RECENT_PROJECTS);
        let recent_projects = projects[skip..]
            .iter()
            .map(|p| RecentProject {
                id: p.id,
                name: p.name.clone(),
                created: p.created_at.format("%Y-%m-%d").to_string(),
            })
            .collect();

        let active_project = session
            .and_then(|s| projects.iter().find(|p| p.id == s.project_id()))
            .map(|p| p.name.clone());

        Self {
            project_count: projects.len(),
            active_project,
            state: session.map(Session::state).unwrap_or(TimerState::Stopped),
            elapsed_display: format_short(session.map(Session::elapsed_secs).unwrap_or(0)),
            label_count: labels.len(),
            label_counts,
            recent_projects,
        }
    }
}
