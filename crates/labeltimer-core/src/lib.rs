//! # Label Timer Core Library
//!
//! This library provides the core business logic for Label Timer, a personal
//! time tracker that attaches quick emoji labels to moments of a running
//! stopwatch or countdown and exports the labeled timeline as CSV.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A tick-driven state machine; the caller advances time
//!   one second at a time through the [`Coordinator`]
//! - **Auto-Label Scheduler**: Periodic label requests while running in
//!   automatic mode
//! - **Activity Log**: Append-only per-project record of timer and label events
//! - **Storage**: Projects persisted as one JSON document in a SQLite key-value
//!   table, TOML-based configuration
//!
//! ## Key Components
//!
//! - [`Coordinator`]: Owns the project store and the active [`Session`]
//! - [`TimerEngine`]: Count-up / count-down state machine
//! - [`ProjectStore`]: Project CRUD over a [`Storage`] backend
//! - [`Config`]: Application configuration management

pub mod activity;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod export;
pub mod format;
pub mod labels;
pub mod ports;
pub mod project;
pub mod scheduler;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use activity::{ActivityLog, LogAction, LogEntry};
pub use coordinator::{Coordinator, KeyOutcome};
pub use error::{ConfigError, CoreError, NotFoundError, PersistenceError, ValidationError};
pub use events::Event;
pub use export::{export_filename, labels_to_csv};
pub use format::{format_clock, format_short};
pub use labels::{option_for_key, InputFocus, LabelOption, CATALOG};
pub use ports::{ExportSink, Headless, Notifier, Ports, Prompter};
pub use project::{Project, ProjectStore, STORAGE_KEY};
pub use scheduler::{AutoLabelScheduler, LabelingMode};
pub use session::{Session, SettingsChange, TimerSettings};
pub use stats::Dashboard;
pub use storage::{Config, Database, MemoryStorage, Storage};
pub use timer::{PeriodicHandle, TimerEngine, TimerKind, TimerState};
