mod engine;
mod handle;

pub use engine::{TimerEngine, TimerKind, TimerState};
pub use handle::{HandleId, HandleIssuer, PeriodicHandle};
