//! In-memory timer/labeling session for the active project.
//!
//! A `Session` is rebuilt from a project's stored log whenever that project
//! becomes active. It owns the timer engine, the activity log and the two
//! periodic handles that exist only while the timer runs: the one-second tick
//! and the auto-label scheduler. Every exit from `Running` drops both.

use std::ops::RangeInclusive;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::{ActivityLog, EntryDraft, LogAction, LogEntry};
use crate::error::ValidationError;
use crate::events::Event;
use crate::labels::LabelOption;
use crate::scheduler::{AutoLabelScheduler, LabelingMode};
use crate::timer::{HandleId, HandleIssuer, PeriodicHandle, TimerEngine, TimerKind, TimerState};

pub const INTERVAL_RANGE: RangeInclusive<u64> = 1..=3600;
pub const COUNTDOWN_RANGE: RangeInclusive<u64> = 1..=86_400;

/// Timer defaults shared by every session; also the `[timer]` config table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSettings {
    #[serde(default)]
    pub kind: TimerKind,
    #[serde(default)]
    pub mode: LabelingMode,
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u64,
}

fn default_interval_secs() -> u64 {
    60
}

fn default_countdown_secs() -> u64 {
    300
}

impl Default for TimerSettings {
    fn default() -> Self {
        Self {
            kind: TimerKind::CountUp,
            mode: LabelingMode::Automatic,
            interval_secs: default_interval_secs(),
            countdown_secs: default_countdown_secs(),
        }
    }
}

impl TimerSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_range("interval_secs", self.interval_secs, &INTERVAL_RANGE)?;
        check_range("countdown_secs", self.countdown_secs, &COUNTDOWN_RANGE)?;
        Ok(())
    }

    /// Apply a partial change, validating the result as a whole.
    pub fn merged(&self, change: &SettingsChange) -> Result<Self, ValidationError> {
        let next = Self {
            kind: change.kind.unwrap_or(self.kind),
            mode: change.mode.unwrap_or(self.mode),
            interval_secs: change.interval_secs.unwrap_or(self.interval_secs),
            countdown_secs: change.countdown_secs.unwrap_or(self.countdown_secs),
        };
        next.validate()?;
        Ok(next)
    }
}

fn check_range(
    field: &'static str,
    value: u64,
    range: &RangeInclusive<u64>,
) -> Result<(), ValidationError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            min: *range.start(),
            max: *range.end(),
            value,
        })
    }
}

/// Partial settings update from the presentation layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsChange {
    pub interval_secs: Option<u64>,
    pub countdown_secs: Option<u64>,
    pub mode: Option<LabelingMode>,
    pub kind: Option<TimerKind>,
}

/// What one simulated second produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SecondOutcome {
    /// `TimerStopped` entry appended because a count-down hit zero.
    pub expired: Option<LogEntry>,
    pub label_requested: bool,
}

#[derive(Debug)]
pub struct Session {
    project_id: u64,
    engine: TimerEngine,
    mode: LabelingMode,
    scheduler: AutoLabelScheduler,
    tick: Option<PeriodicHandle>,
    issuer: HandleIssuer,
    log: ActivityLog,
}

impl Session {
    pub fn new(project_id: u64, settings: &TimerSettings, entries: Vec<LogEntry>) -> Self {
        Self {
            project_id,
            engine: TimerEngine::new(settings.kind, settings.countdown_secs),
            mode: settings.mode,
            scheduler: AutoLabelScheduler::new(settings.interval_secs),
            tick: None,
            issuer: HandleIssuer::default(),
            log: ActivityLog::from_entries(entries),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn project_id(&self) -> u64 {
        self.project_id
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.engine.elapsed_secs()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn state(&self) -> TimerState {
        self.engine.state()
    }

    pub fn kind(&self) -> TimerKind {
        self.engine.kind()
    }

    pub fn mode(&self) -> LabelingMode {
        self.mode
    }

    pub fn interval_secs(&self) -> u64 {
        self.scheduler.interval_secs()
    }

    pub fn countdown_secs(&self) -> u64 {
        self.engine.countdown_secs()
    }

    pub fn log(&self) -> &ActivityLog {
        &self.log
    }

    pub fn labels(&self) -> Vec<&LogEntry> {
        self.log.labels()
    }

    /// Current engine state as an [`Event::StateSnapshot`].
    pub fn snapshot(&self) -> Event {
        self.engine.snapshot()
    }

    pub fn tick_handle_id(&self) -> Option<HandleId> {
        self.tick.as_ref().map(PeriodicHandle::id)
    }

    pub fn scheduler_handle_id(&self) -> Option<HandleId> {
        self.scheduler.handle_id()
    }

    // ── Timer control ────────────────────────────────────────────────

    pub fn start(&mut self, at: DateTime<Utc>) -> Option<LogEntry> {
        self.engine.start()?;
        self.tick = Some(self.issuer.arm(1));
        if self.mode == LabelingMode::Automatic {
            self.scheduler.arm(&mut self.issuer);
        }
        Some(self.record(LogAction::TimerStarted, at))
    }

    pub fn pause(&mut self, at: DateTime<Utc>) -> Option<LogEntry> {
        self.engine.pause()?;
        self.halt();
        Some(self.record(LogAction::TimerPaused, at))
    }

    pub fn stop(&mut self, at: DateTime<Utc>) -> Option<LogEntry> {
        self.engine.stop()?;
        self.halt();
        Some(self.record(LogAction::TimerStopped, at))
    }

    /// Back to the kind's initial value. Not logged; labels are kept.
    pub fn reset(&mut self) -> Option<Event> {
        let event = self.engine.reset();
        self.halt();
        event
    }

    /// Drop both periodic handles.
    pub fn halt(&mut self) {
        self.tick = None;
        self.scheduler.disarm();
    }

    /// Advance one wall-clock second. The tick runs first; if it expires a
    /// count-down, the stop is fully recorded and both handles are gone
    /// before the scheduler is consulted, so no request fires that second.
    pub fn advance_second(&mut self, at: DateTime<Utc>) -> SecondOutcome {
        let mut outcome = SecondOutcome::default();
        let Some(tick) = self.tick.as_mut() else {
            return outcome;
        };
        if tick.advance() {
            if let Some(Event::CountdownFinished { .. }) = self.engine.tick() {
                self.halt();
                outcome.expired = Some(self.record(LogAction::TimerStopped, at));
                return outcome;
            }
        }
        outcome.label_requested = self.scheduler.advance();
        outcome
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Switch labeling mode; arms or disarms the scheduler if running.
    pub fn set_mode(&mut self, mode: LabelingMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        if !self.is_running() {
            return;
        }
        match mode {
            LabelingMode::Automatic => {
                self.scheduler.arm(&mut self.issuer);
            }
            LabelingMode::Manual => self.scheduler.disarm(),
        }
    }

    pub fn set_interval_secs(&mut self, secs: u64) {
        self.scheduler.set_interval_secs(secs);
    }

    pub fn set_countdown_secs(&mut self, secs: u64) {
        self.engine.set_countdown_secs(secs);
    }

    /// Switch timer kind. A running timer is stopped (and the stop logged)
    /// before the kind changes. Returns the stop entry if one was written.
    pub fn set_kind(&mut self, kind: TimerKind, at: DateTime<Utc>) -> Option<LogEntry> {
        if kind == self.engine.kind() {
            return None;
        }
        let stopped = if self.is_running() { self.stop(at) } else { None };
        // Cannot fail: the engine is no longer running.
        if let Err(e) = self.engine.set_kind(kind) {
            tracing::error!(error = %e, "timer kind switch refused after stop");
        }
        stopped
    }

    // ── Log ──────────────────────────────────────────────────────────

    pub fn add_label(&mut self, option: &LabelOption, at: DateTime<Utc>) -> LogEntry {
        self.record(EntryDraft::label(option), at)
    }

    pub fn remove_entry(&mut self, id: u64) -> Option<LogEntry> {
        self.log.remove(id)
    }

    fn record(&mut self, action: LogAction, at: DateTime<Utc>) -> LogEntry {
        self.log
            .append(EntryDraft {
                action,
                at,
                time: self.engine.elapsed_secs(),
                mode: self.mode,
                timer_kind: self.engine.kind(),
                project_id: self.project_id,
            })
            .clone()
    }
}
