mod config;
pub mod database;
mod memory;

pub use config::{Config, NotificationsConfig};
pub use database::Database;
pub use memory::MemoryStorage;

use std::path::PathBuf;

use crate::error::PersistenceError;

/// Key-value blob store the project set is persisted in.
///
/// Values are whole JSON documents; callers always write complete snapshots,
/// so a later write fully supersedes an earlier one.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).set(key, value)
    }
}

/// Returns `~/.config/labeltimer[-dev]/` based on LABELTIMER_ENV.
///
/// Set LABELTIMER_ENV=dev to use development data directory, or
/// LABELTIMER_DATA_DIR to point somewhere else entirely.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let dir = match std::env::var_os("LABELTIMER_DATA_DIR") {
        Some(custom) => PathBuf::from(custom),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("LABELTIMER_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("labeltimer-dev")
            } else {
                base_dir.join("labeltimer")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
