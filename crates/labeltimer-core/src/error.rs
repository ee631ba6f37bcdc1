//! Core error types for labeltimer-core.
//!
//! Every fallible operation in the library returns [`CoreError`] or one of
//! the narrower enums below. Only validation failures are meant to reach the
//! user as a hard error; missing ids are benign and persistence failures are
//! reported but never undo the in-memory change.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for labeltimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persistent store errors
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Lookup of a project or log entry that does not exist
    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The external key-value store could not be read or written.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Read or write against the store failed
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Stored document exists but cannot be decoded
    #[error("Stored document under '{key}' is corrupt: {message}")]
    Corrupt { key: String, message: String },

    /// Write refused because the stored document was never read
    #[error("Refusing to overwrite '{key}': stored document was never loaded")]
    NotLoaded { key: String },

    /// Document could not be encoded
    #[error("Failed to encode document: {0}")]
    Encode(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("project name must not be empty")]
    EmptyName,

    #[error("project name must be at least {min} characters")]
    NameTooShort { min: usize },

    #[error("project name must be at most {max} characters")]
    NameTooLong { max: usize },

    #[error("a project named '{0}' already exists")]
    DuplicateName(String),

    /// Numeric setting outside its allowed range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: u64,
        max: u64,
        value: u64,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Operation addressed an id that is not present.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotFoundError {
    #[error("project {0} not found")]
    Project(u64),

    #[error("log entry {0} not found")]
    LogEntry(u64),

    #[error("no label bound to key '{0}'")]
    LabelKey(String),
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg)
                if inner.code == rusqlite::ErrorCode::DatabaseLocked
                    || inner.code == rusqlite::ErrorCode::DatabaseBusy =>
            {
                PersistenceError::Unavailable("database is locked".into())
            }
            _ => PersistenceError::Unavailable(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
