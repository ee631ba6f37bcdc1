//! Append-only activity log.
//!
//! One log per project. Entries stay in creation order and ids are strictly
//! increasing: a new id is the larger of the creation instant in epoch
//! milliseconds and one past the highest id this log has issued, so ids are
//! never reused within one loaded log even after the newest entry is deleted.
//!
//! The high-water mark is not persisted. A log rebuilt with
//! [`ActivityLog::from_entries`] starts from the highest id still present, so
//! the id of a deleted newest entry is only kept out of reach by the clock
//! having moved past it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::labels::LabelOption;
use crate::scheduler::LabelingMode;
use crate::timer::TimerKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum LogAction {
    TimerStarted,
    TimerPaused,
    TimerStopped,
    LabelAdded { emoji: String, text: String },
}

impl LogAction {
    pub fn name(&self) -> &'static str {
        match self {
            LogAction::TimerStarted => "timer started",
            LogAction::TimerPaused => "timer paused",
            LogAction::TimerStopped => "timer stopped",
            LogAction::LabelAdded { .. } => "label added",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: u64,
    #[serde(flatten)]
    pub action: LogAction,
    pub timestamp: DateTime<Utc>,
    /// Elapsed (count-up) or remaining (count-down) seconds when recorded.
    pub time: u64,
    pub mode: LabelingMode,
    #[serde(default, alias = "timerType")]
    pub timer_kind: TimerKind,
    #[serde(default)]
    pub project_id: u64,
}

impl LogEntry {
    pub fn is_label(&self) -> bool {
        matches!(self.action, LogAction::LabelAdded { .. })
    }

    pub fn emoji(&self) -> Option<&str> {
        match &self.action {
            LogAction::LabelAdded { emoji, .. } => Some(emoji),
            _ => None,
        }
    }

    /// Label text, or the action name for control events.
    pub fn describe(&self) -> String {
        match &self.action {
            LogAction::LabelAdded { emoji, text } => format!("{emoji} {text}"),
            other => other.name().to_string(),
        }
    }
}

/// Everything about a new entry except its id.
#[derive(Debug, Clone)]
pub struct EntryDraft {
    pub action: LogAction,
    pub at: DateTime<Utc>,
    pub time: u64,
    pub mode: LabelingMode,
    pub timer_kind: TimerKind,
    pub project_id: u64,
}

impl EntryDraft {
    pub fn label(option: &LabelOption) -> LogAction {
        LogAction::LabelAdded {
            emoji: option.emoji.to_string(),
            text: option.text.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActivityLog {
    entries: Vec<LogEntry>,
    last_id: u64,
}

impl ActivityLog {
    /// Rebuild a log from stored entries. Ids continue after the highest one.
    pub fn from_entries(entries: Vec<LogEntry>) -> Self {
        let last_id = entries.iter().map(|e| e.id).max().unwrap_or(0);
        Self { entries, last_id }
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&LogEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// The label view: `LabelAdded` entries in log order.
    pub fn labels(&self) -> Vec<&LogEntry> {
        self.entries.iter().filter(|e| e.is_label()).collect()
    }

    /// Full copy of the log for a snapshot save.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.clone()
    }

    pub fn append(&mut self, draft: EntryDraft) -> &LogEntry {
        let id = self.next_id(draft.at);
        self.entries.push(LogEntry {
            id,
            action: draft.action,
            timestamp: draft.at,
            time: draft.time,
            mode: draft.mode,
            timer_kind: draft.timer_kind,
            project_id: draft.project_id,
        });
        let idx = self.entries.len() - 1;
        &self.entries[idx]
    }

    /// Remove an entry by id. Other ids are untouched.
    pub fn remove(&mut self, id: u64) -> Option<LogEntry> {
        let idx = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(idx))
    }

    fn next_id(&mut self, at: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(at.timestamp_millis()).unwrap_or(0);
        let id = millis.max(self.last_id + 1);
        self.last_id = id;
        id
    }
}
