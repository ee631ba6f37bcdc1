use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{TimerKind, TimerState};

/// Every state change in the timer produces an Event.
/// The presentation layer renders them; the coordinator turns the control
/// events into activity log entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        kind: TimerKind,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    TimerStopped {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    /// A count-down reached zero and stopped on its own.
    CountdownFinished {
        at: DateTime<Utc>,
    },
    /// The auto-label scheduler (or a manual trigger) asks the user to pick
    /// a label. Nothing is recorded until one is chosen.
    LabelRequested {
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        kind: TimerKind,
        elapsed_secs: u64,
        countdown_secs: u64,
        at: DateTime<Utc>,
    },
}
