use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::Storage;
use crate::error::PersistenceError;

/// In-process store. Can be switched into a failing mode to exercise the
/// persistence-error paths.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
    failing: Cell<bool>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let storage = Self::default();
        storage
            .values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        storage
    }

    /// While set, every read and write fails with `Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        if self.failing.get() {
            return Err(PersistenceError::Unavailable("memory store offline".into()));
        }
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        if self.failing.get() {
            return Err(PersistenceError::Unavailable("memory store offline".into()));
        }
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
