//! Automatic label scheduler.
//!
//! While the timer runs in [`LabelingMode::Automatic`], the scheduler asks for
//! a label once every `interval_secs` of wall-clock time, regardless of which
//! way the timer counts. It only reports that a request is due; prompting the
//! user is the presentation layer's job.
//!
//! The armed interval lives in a [`PeriodicHandle`]. Disarming drops it, so a
//! later re-arm always starts a fresh period with no carried-over phase.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::{HandleId, HandleIssuer, PeriodicHandle};

/// How labels get attached while the timer runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LabelingMode {
    /// Mode 1: label requests fire on a fixed period.
    #[default]
    Automatic,
    /// Mode 2: labels only on explicit user action.
    Manual,
}

impl LabelingMode {
    pub fn number(self) -> u8 {
        match self {
            LabelingMode::Automatic => 1,
            LabelingMode::Manual => 2,
        }
    }
}

impl From<LabelingMode> for u8 {
    fn from(mode: LabelingMode) -> Self {
        mode.number()
    }
}

impl TryFrom<u8> for LabelingMode {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(LabelingMode::Automatic),
            2 => Ok(LabelingMode::Manual),
            other => Err(ValidationError::InvalidValue {
                field: "mode".into(),
                message: format!("expected 1 (automatic) or 2 (manual), got {other}"),
            }),
        }
    }
}

impl std::fmt::Display for LabelingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Mode {}", self.number())
    }
}

#[derive(Debug, Clone)]
pub struct AutoLabelScheduler {
    interval_secs: u64,
    handle: Option<PeriodicHandle>,
}

impl AutoLabelScheduler {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval_secs,
            handle: None,
        }
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    /// Applies on the next [`arm`](Self::arm); an armed period is left alone.
    pub fn set_interval_secs(&mut self, secs: u64) {
        self.interval_secs = secs;
    }

    pub fn is_armed(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handle_id(&self) -> Option<HandleId> {
        self.handle.as_ref().map(PeriodicHandle::id)
    }

    /// Arm with a fresh period, replacing any live handle.
    pub fn arm(&mut self, issuer: &mut HandleIssuer) -> HandleId {
        let handle = issuer.arm(self.interval_secs);
        let id = handle.id();
        tracing::debug!(interval_secs = self.interval_secs, handle = id.0, "auto-label scheduler armed");
        self.handle = Some(handle);
        id
    }

    pub fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            tracing::debug!(handle = handle.id().0, "auto-label scheduler disarmed");
        }
    }

    /// Advance one second. Returns true when a label request is due.
    pub fn advance(&mut self) -> bool {
        self.handle.as_mut().is_some_and(PeriodicHandle::advance)
    }
}
