//! Project records and the store that persists them.
//!
//! The whole project set is one JSON array under [`STORAGE_KEY`]. Mutations
//! change the in-memory set only; [`ProjectStore::persist`] writes the full
//! snapshot. Writing complete snapshots keeps saves idempotent: the last
//! write wins by content, whatever order earlier writes landed in.
//!
//! A store refuses to persist until it has read the stored document at least
//! once. A snapshot taken before that would overwrite projects it never saw.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::activity::LogEntry;
use crate::error::{NotFoundError, PersistenceError, ValidationError};
use crate::storage::Storage;

pub const STORAGE_KEY: &str = "labelTimerProjects";

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "logs")]
    pub log: Vec<LogEntry>,
}

pub struct ProjectStore<S: Storage> {
    storage: S,
    projects: Vec<Project>,
    loaded: bool,
}

impl<S: Storage> ProjectStore<S> {
    /// An empty store. Call [`reload`](Self::reload) to read persisted projects.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            projects: Vec::new(),
            loaded: false,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Whether the stored document has been read (or found missing or corrupt).
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Replace the in-memory set with the persisted one.
    ///
    /// On error the in-memory set is left as it was. A corrupt document still
    /// counts as loaded: the next [`persist`](Self::persist) replaces it.
    pub fn reload(&mut self) -> Result<(), PersistenceError> {
        let Some(raw) = self.storage.get(STORAGE_KEY)? else {
            self.projects.clear();
            self.loaded = true;
            return Ok(());
        };
        self.loaded = true;
        let projects: Vec<Project> =
            serde_json::from_str(&raw).map_err(|e| PersistenceError::Corrupt {
                key: STORAGE_KEY.to_string(),
                message: e.to_string(),
            })?;
        tracing::debug!(count = projects.len(), "projects loaded");
        self.projects = projects;
        Ok(())
    }

    /// [`reload`](Self::reload) unless a previous load already succeeded.
    pub fn ensure_loaded(&mut self) -> Result<(), PersistenceError> {
        if self.loaded {
            return Ok(());
        }
        self.reload()
    }

    /// Write the full project set.
    ///
    /// Fails with [`PersistenceError::NotLoaded`] while the stored document
    /// has never been read.
    pub fn persist(&self) -> Result<(), PersistenceError> {
        if !self.loaded {
            return Err(PersistenceError::NotLoaded {
                key: STORAGE_KEY.to_string(),
            });
        }
        let json = serde_json::to_string(&self.projects)
            .map_err(|e| PersistenceError::Encode(e.to_string()))?;
        self.storage.set(STORAGE_KEY, &json)
    }

    pub fn list(&self) -> &[Project] {
        &self.projects
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    pub fn get(&self, id: u64) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Project> {
        let wanted = name.trim().to_lowercase();
        self.projects
            .iter()
            .find(|p| p.name.to_lowercase() == wanted)
    }

    /// Check a proposed name and return it trimmed.
    pub fn validate_name(&self, name: &str) -> Result<String, ValidationError> {
        let trimmed = name.trim();
        let chars = trimmed.chars().count();
        if chars == 0 {
            return Err(ValidationError::EmptyName);
        }
        if chars < NAME_MIN_CHARS {
            return Err(ValidationError::NameTooShort { min: NAME_MIN_CHARS });
        }
        if chars > NAME_MAX_CHARS {
            return Err(ValidationError::NameTooLong { max: NAME_MAX_CHARS });
        }
        if let Some(existing) = self.find_by_name(trimmed) {
            return Err(ValidationError::DuplicateName(existing.name.clone()));
        }
        Ok(trimmed.to_string())
    }

    /// Add a project with an empty log. Does not persist.
    pub fn create(&mut self, name: &str, at: DateTime<Utc>) -> Result<&Project, ValidationError> {
        let name = self.validate_name(name)?;
        let millis = u64::try_from(at.timestamp_millis()).unwrap_or(0);
        let next_after_existing = self.projects.iter().map(|p| p.id + 1).max().unwrap_or(0);
        let id = millis.max(next_after_existing);
        self.projects.push(Project {
            id,
            name,
            created_at: at,
            log: Vec::new(),
        });
        let idx = self.projects.len() - 1;
        Ok(&self.projects[idx])
    }

    /// Remove a project. Does not persist.
    pub fn remove(&mut self, id: u64) -> Result<Project, NotFoundError> {
        let idx = self
            .projects
            .iter()
            .position(|p| p.id == id)
            .ok_or(NotFoundError::Project(id))?;
        Ok(self.projects.remove(idx))
    }

    /// Replace a project's log with a snapshot. Does not persist.
    pub fn replace_log(&mut self, id: u64, log: Vec<LogEntry>) -> Result<(), NotFoundError> {
        let project = self
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(NotFoundError::Project(id))?;
        project.log = log;
        Ok(())
    }

    /// Replace a project's log and persist the full set.
    pub fn save_log(&mut self, id: u64, log: Vec<LogEntry>) -> crate::error::Result<()> {
        self.replace_log(id, log)?;
        self.persist()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use chrono::TimeZone;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn create_validates_names() {
        let mut store = ProjectStore::new(MemoryStorage::new());
        assert_eq!(store.validate_name("   "), Err(ValidationError::EmptyName));
        assert_eq!(
            store.validate_name("a"),
            Err(ValidationError::NameTooShort { min: 2 })
        );
        assert_eq!(
            store.validate_name(&"x".repeat(51)),
            Err(ValidationError::NameTooLong { max: 50 })
        );
        assert!(store.validate_name(&"x".repeat(50)).is_ok());

        store.create("Research", at(1)).unwrap();
        assert_eq!(
            store.validate_name("research").unwrap_err(),
            ValidationError::DuplicateName("Research".into())
        );
    }

    #[test]
    fn name_length_counts_characters_not_bytes() {
        let store = ProjectStore::new(MemoryStorage::new());
        // 20 Thai characters, 60 bytes.
        let name = "การศึกษาพฤติกรรมงานว";
        assert!(name.len() > NAME_MAX_CHARS);
        assert!(store.validate_name(name).is_ok());
    }

    #[test]
    fn create_trims_and_assigns_increasing_ids() {
        let mut store = ProjectStore::new(MemoryStorage::new());
        let a = store.create("  Alpha  ", at(1_000)).unwrap().id;
        let b = store.create("Beta", at(1_000)).unwrap().id;
        assert_eq!(store.get(a).unwrap().name, "Alpha");
        assert!(b > a);
    }

    #[test]
    fn create_does_not_persist_until_asked() {
        let storage = MemoryStorage::new();
        let mut store = ProjectStore::new(&storage);
        store.reload().unwrap();
        store.create("Alpha", at(1)).unwrap();
        assert!(storage.raw(STORAGE_KEY).is_none());
        store.persist().unwrap();
        assert!(storage.raw(STORAGE_KEY).is_some());
    }

    #[test]
    fn remove_missing_is_not_found() {
        let mut store = ProjectStore::new(MemoryStorage::new());
        assert_eq!(store.remove(9), Err(NotFoundError::Project(9)));
    }

    #[test]
    fn reload_reads_persisted_order() {
        let storage = MemoryStorage::new();
        {
            let mut store = ProjectStore::new(&storage);
            store.reload().unwrap();
            store.create("First", at(10)).unwrap();
            store.create("Second", at(20)).unwrap();
            store.persist().unwrap();
        }
        let mut store = ProjectStore::new(&storage);
        store.reload().unwrap();
        let names: Vec<&str> = store.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[test]
    fn reload_corrupt_document_keeps_memory() {
        let storage = MemoryStorage::with_value(STORAGE_KEY, "{not json");
        let mut store = ProjectStore::new(&storage);
        let err = store.reload().unwrap_err();
        assert!(matches!(err, PersistenceError::Corrupt { .. }));
        assert!(store.is_empty());
        assert!(store.is_loaded());
        assert_eq!(storage.raw(STORAGE_KEY).as_deref(), Some("{not json"));
    }

    #[test]
    fn persist_refused_until_document_is_read() {
        let storage = MemoryStorage::with_value(
            STORAGE_KEY,
            r#"[{"id":5,"name":"Old","createdAt":"2024-05-01T08:00:00Z","log":[]}]"#,
        );
        let mut store = ProjectStore::new(&storage);
        storage.set_failing(true);
        assert!(store.reload().is_err());
        assert!(!store.is_loaded());
        storage.set_failing(false);

        assert!(matches!(
            store.persist(),
            Err(PersistenceError::NotLoaded { .. })
        ));
        assert!(storage.raw(STORAGE_KEY).unwrap().contains("Old"));

        store.ensure_loaded().unwrap();
        store.create("New", at(10)).unwrap();
        store.persist().unwrap();
        let raw = storage.raw(STORAGE_KEY).unwrap();
        assert!(raw.contains("Old") && raw.contains("New"));
    }

    #[test]
    fn reload_accepts_legacy_logs_field() {
        let raw = r#"[{"id":1714550400000,"name":"Legacy","createdAt":"2024-05-01T08:00:00.000Z",
            "logs":[{"id":1714550401000,"action":"label_added","emoji":"😊","text":"ปกติ",
            "time":5,"timestamp":"2024-05-01T08:00:01.000Z","mode":1,"projectId":1714550400000,
            "timerType":"stopwatch"}]}]"#;
        let storage = MemoryStorage::with_value(STORAGE_KEY, raw);
        let mut store = ProjectStore::new(&storage);
        store.reload().unwrap();
        let project = &store.list()[0];
        assert_eq!(project.log.len(), 1);
        assert_eq!(project.log[0].time, 5);
    }

    #[test]
    fn save_log_unknown_project() {
        let mut store = ProjectStore::new(MemoryStorage::new());
        assert!(store.save_log(3, Vec::new()).is_err());
    }

    #[test]
    fn persist_failure_is_reported() {
        let storage = MemoryStorage::new();
        let mut store = ProjectStore::new(&storage);
        store.reload().unwrap();
        store.create("Alpha", at(1)).unwrap();
        storage.set_failing(true);
        assert!(matches!(
            store.persist(),
            Err(PersistenceError::Unavailable(_))
        ));
        assert_eq!(store.list().len(), 1);
    }
}
