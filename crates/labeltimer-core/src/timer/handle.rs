//! Cancellable periodic timer handles.
//!
//! A handle stands in for one armed interval. It is advanced one second at a
//! time by its owner and reports when a full period has passed. Cancelling is
//! dropping the handle; every handle carries a generation id so a caller can
//! tell whether the handle it armed is still the live one.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandleId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodicHandle {
    id: HandleId,
    period_secs: u64,
    /// Seconds elapsed since the last fire.
    phase_secs: u64,
}

impl PeriodicHandle {
    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn period_secs(&self) -> u64 {
        self.period_secs
    }

    /// Advance one second. Returns true when the period boundary is crossed.
    pub fn advance(&mut self) -> bool {
        self.phase_secs += 1;
        if self.phase_secs >= self.period_secs {
            self.phase_secs = 0;
            true
        } else {
            false
        }
    }
}

/// Hands out handles with strictly increasing generation ids.
#[derive(Debug, Clone, Default)]
pub struct HandleIssuer {
    next: u64,
}

impl HandleIssuer {
    pub fn arm(&mut self, period_secs: u64) -> PeriodicHandle {
        self.next += 1;
        PeriodicHandle {
            id: HandleId(self.next),
            period_secs: period_secs.max(1),
            phase_secs: 0,
        }
    }
}
