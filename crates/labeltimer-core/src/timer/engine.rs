//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use internal
//! threads or read the clock - the caller is responsible for calling `tick()`
//! once per elapsed second while the engine is running.
//!
//! ## State Transitions
//!
//! ```text
//! Stopped -> Running -> Paused -> Running -> ... -> Stopped
//! ```
//!
//! A count-down engine that ticks down to zero stops itself; that is the
//! only transition not triggered by an explicit command.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(TimerKind::CountDown, 300);
//! engine.start();
//! // Once per second:
//! engine.tick(); // Returns Some(Event::CountdownFinished) on expiry
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::Event;

/// Direction the engine counts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TimerKind {
    /// Stopwatch: elapsed seconds grow from zero.
    #[default]
    #[serde(rename = "count-up", alias = "stopwatch")]
    CountUp,
    /// Countdown: remaining seconds shrink towards zero.
    #[serde(rename = "count-down", alias = "countdown")]
    CountDown,
}

impl TimerKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TimerKind::CountUp => "count-up",
            TimerKind::CountDown => "count-down",
        }
    }
}

impl std::fmt::Display for TimerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimerKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count-up" | "countup" | "stopwatch" | "up" => Ok(TimerKind::CountUp),
            "count-down" | "countdown" | "down" => Ok(TimerKind::CountDown),
            other => Err(ValidationError::InvalidValue {
                field: "timer_kind".into(),
                message: format!("expected count-up or count-down, got '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Stopped,
    Running,
    /// Not running, elapsed retained.
    Paused,
}

impl TimerState {
    pub fn as_str(self) -> &'static str {
        match self {
            TimerState::Stopped => "stopped",
            TimerState::Running => "running",
            TimerState::Paused => "paused",
        }
    }
}

impl std::fmt::Display for TimerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core timer engine.
///
/// Counts whole seconds. For [`TimerKind::CountUp`] `elapsed_secs` is the
/// time spent; for [`TimerKind::CountDown`] it is the time remaining.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    kind: TimerKind,
    state: TimerState,
    elapsed_secs: u64,
    countdown_secs: u64,
}

impl TimerEngine {
    /// Create a stopped engine with zero elapsed time.
    pub fn new(kind: TimerKind, countdown_secs: u64) -> Self {
        Self {
            kind,
            state: TimerState::Stopped,
            elapsed_secs: 0,
            countdown_secs,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn kind(&self) -> TimerKind {
        self.kind
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn countdown_secs(&self) -> u64 {
        self.countdown_secs
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            kind: self.kind,
            elapsed_secs: self.elapsed_secs,
            countdown_secs: self.countdown_secs,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        if self.state == TimerState::Running {
            return None;
        }
        if self.kind == TimerKind::CountDown && self.elapsed_secs == 0 {
            self.elapsed_secs = self.countdown_secs;
        }
        self.state = TimerState::Running;
        Some(Event::TimerStarted {
            kind: self.kind,
            elapsed_secs: self.elapsed_secs,
            at: Utc::now(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                Some(Event::TimerPaused {
                    elapsed_secs: self.elapsed_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn stop(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running | TimerState::Paused => {
                self.state = TimerState::Stopped;
                Some(Event::TimerStopped {
                    elapsed_secs: self.elapsed_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Stopped => None,
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.state = TimerState::Stopped;
        self.elapsed_secs = self.initial_elapsed();
        Some(Event::TimerReset {
            elapsed_secs: self.elapsed_secs,
            at: Utc::now(),
        })
    }

    /// Advance by one second. Returns `Some(Event::CountdownFinished)` when a
    /// count-down reaches zero; the engine is already stopped at that point.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        match self.kind {
            TimerKind::CountUp => {
                self.elapsed_secs = self.elapsed_secs.saturating_add(1);
                None
            }
            TimerKind::CountDown => {
                self.elapsed_secs = self.elapsed_secs.saturating_sub(1);
                if self.elapsed_secs == 0 {
                    self.state = TimerState::Stopped;
                    return Some(Event::CountdownFinished { at: Utc::now() });
                }
                None
            }
        }
    }

    /// Switch counting direction. Refused while running; on success the
    /// elapsed value is reinitialised for the new kind.
    pub fn set_kind(&mut self, kind: TimerKind) -> Result<(), ValidationError> {
        if self.is_running() {
            return Err(ValidationError::InvalidValue {
                field: "timer_kind".into(),
                message: "cannot change timer kind while the timer is running".into(),
            });
        }
        self.kind = kind;
        self.state = TimerState::Stopped;
        self.elapsed_secs = self.initial_elapsed();
        Ok(())
    }

    /// Takes effect on the next start from zero or the next reset.
    pub fn set_countdown_secs(&mut self, secs: u64) {
        self.countdown_secs = secs;
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn initial_elapsed(&self) -> u64 {
        match self.kind {
            TimerKind::CountUp => 0,
            TimerKind::CountDown => self.countdown_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_pause_resume() {
        let mut engine = TimerEngine::new(TimerKind::CountUp, 300);
        assert_eq!(engine.state(), TimerState::Stopped);

        assert!(engine.start().is_some());
        assert_eq!(engine.state(), TimerState::Running);
        assert!(engine.start().is_none(), "second start is a no-op");

        engine.tick();
        engine.tick();
        assert!(engine.pause().is_some());
        assert_eq!(engine.state(), TimerState::Paused);
        assert_eq!(engine.elapsed_secs(), 2);

        assert!(engine.tick().is_none());
        assert_eq!(engine.elapsed_secs(), 2, "paused engine ignores ticks");

        assert!(engine.start().is_some());
        engine.tick();
        assert_eq!(engine.elapsed_secs(), 3);
    }

    #[test]
    fn countdown_start_loads_duration() {
        let mut engine = TimerEngine::new(TimerKind::CountDown, 90);
        engine.start();
        assert_eq!(engine.elapsed_secs(), 90);
        engine.tick();
        assert_eq!(engine.elapsed_secs(), 89);
    }

    #[test]
    fn countdown_resume_keeps_remaining() {
        let mut engine = TimerEngine::new(TimerKind::CountDown, 90);
        engine.start();
        engine.tick();
        engine.pause();
        engine.start();
        assert_eq!(engine.elapsed_secs(), 89);
    }

    #[test]
    fn countdown_expires_and_stops() {
        let mut engine = TimerEngine::new(TimerKind::CountDown, 3);
        engine.start();
        assert!(engine.tick().is_none());
        assert!(engine.tick().is_none());
        let event = engine.tick();
        assert!(matches!(event, Some(Event::CountdownFinished { .. })));
        assert_eq!(engine.state(), TimerState::Stopped);
        assert_eq!(engine.elapsed_secs(), 0);
        assert!(engine.tick().is_none());
    }

    #[test]
    fn stop_retains_elapsed() {
        let mut engine = TimerEngine::new(TimerKind::CountUp, 300);
        engine.start();
        engine.tick();
        assert!(engine.stop().is_some());
        assert_eq!(engine.elapsed_secs(), 1);
        assert!(engine.stop().is_none());
    }

    #[test]
    fn stop_from_paused_is_allowed() {
        let mut engine = TimerEngine::new(TimerKind::CountUp, 300);
        engine.start();
        engine.pause();
        assert!(engine.stop().is_some());
        assert_eq!(engine.state(), TimerState::Stopped);
    }

    #[test]
    fn reset_uses_kind_initial_value() {
        let mut engine = TimerEngine::new(TimerKind::CountUp, 300);
        engine.start();
        engine.tick();
        engine.reset();
        assert_eq!(engine.elapsed_secs(), 0);
        assert!(!engine.is_running());

        let mut engine = TimerEngine::new(TimerKind::CountDown, 300);
        engine.start();
        engine.tick();
        engine.reset();
        assert_eq!(engine.elapsed_secs(), 300);
    }

    #[test]
    fn set_kind_refused_while_running() {
        let mut engine = TimerEngine::new(TimerKind::CountUp, 120);
        engine.start();
        assert!(engine.set_kind(TimerKind::CountDown).is_err());
        assert_eq!(engine.kind(), TimerKind::CountUp);
        assert!(engine.is_running());

        engine.stop();
        engine.set_kind(TimerKind::CountDown).unwrap();
        assert_eq!(engine.kind(), TimerKind::CountDown);
        assert_eq!(engine.elapsed_secs(), 120);
    }

    #[test]
    fn kind_serializes_with_hyphen() {
        assert_eq!(
            serde_json::to_string(&TimerKind::CountDown).unwrap(),
            "\"count-down\""
        );
        let legacy: TimerKind = serde_json::from_str("\"stopwatch\"").unwrap();
        assert_eq!(legacy, TimerKind::CountUp);
    }

    #[test]
    fn kind_parses_from_cli_words() {
        assert_eq!("countdown".parse::<TimerKind>().unwrap(), TimerKind::CountDown);
        assert_eq!("Count-Up".parse::<TimerKind>().unwrap(), TimerKind::CountUp);
        assert!("sideways".parse::<TimerKind>().is_err());
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let engine = TimerEngine::new(TimerKind::CountDown, 300);
        match engine.snapshot() {
            Event::StateSnapshot {
                state,
                elapsed_secs,
                countdown_secs,
                ..
            } => {
                assert_eq!(state, TimerState::Stopped);
                assert_eq!(elapsed_secs, 0);
                assert_eq!(countdown_secs, 300);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
