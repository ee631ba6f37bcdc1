//! The coordinator: single owner of the project store and the active session.
//!
//! All inbound operations from the presentation layer land here. The
//! coordinator applies them to the [`Session`], appends to the activity log,
//! writes the active project's log back through the [`ProjectStore`] and
//! reports outcomes through the injected [`Ports`].
//!
//! Time only moves when the caller invokes [`Coordinator::advance`]; a real
//! front end calls it once per wall-clock second, tests call it with however
//! many simulated seconds they need.
//!
//! Persistence failures never undo the in-memory change and never stop a
//! running timer. They are reported and the next mutation writes the full
//! snapshot again.

use chrono::{DateTime, Utc};

use crate::activity::LogEntry;
use crate::error::{CoreError, NotFoundError, PersistenceError, ValidationError};
use crate::events::Event;
use crate::export::{export_filename, labels_to_csv};
use crate::labels::{option_for_key, InputFocus};
use crate::ports::Ports;
use crate::project::{Project, ProjectStore};
use crate::session::{Session, SettingsChange, TimerSettings};
use crate::stats::Dashboard;
use crate::storage::Storage;

/// Result of a key token arriving from the keyboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome {
    /// The key was typed into a text field; nothing happened.
    Ignored,
    /// Not a label shortcut, or no running session to label.
    Unmapped,
    /// A label was recorded. Any open label prompt should close.
    Labeled(LogEntry),
}

pub struct Coordinator<S: Storage> {
    store: ProjectStore<S>,
    session: Option<Session>,
    settings: TimerSettings,
    ports: Ports,
}

impl<S: Storage> Coordinator<S> {
    /// Load persisted projects and activate the first one, if any.
    pub fn new(storage: S, settings: TimerSettings, ports: Ports) -> Self {
        Self::with_active(storage, settings, ports, None)
    }

    /// Like [`new`](Self::new) but prefer `preferred` as the active project
    /// when it still exists.
    pub fn with_active(
        storage: S,
        settings: TimerSettings,
        ports: Ports,
        preferred: Option<u64>,
    ) -> Self {
        let mut coordinator = Self {
            store: ProjectStore::new(storage),
            session: None,
            settings,
            ports,
        };
        if let Err(e) = coordinator.store.reload() {
            tracing::warn!(error = %e, "could not load projects");
            coordinator.ports.notifier.notify(&format!("⚠️ Could not load projects: {e}"));
        }
        let initial = preferred
            .filter(|id| coordinator.store.get(*id).is_some())
            .or_else(|| coordinator.store.list().first().map(|p| p.id));
        if let Some(id) = initial {
            coordinator.activate(id);
        }
        coordinator
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn projects(&self) -> &[Project] {
        self.store.list()
    }

    pub fn storage(&self) -> &S {
        self.store.storage()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn settings(&self) -> &TimerSettings {
        &self.settings
    }

    pub fn active_project(&self) -> Option<&Project> {
        let id = self.session.as_ref()?.project_id();
        self.store.get(id)
    }

    pub fn dashboard(&self) -> Dashboard {
        Dashboard::build(self.store.list(), self.session.as_ref())
    }

    /// State of the active session's timer, if a project is active.
    pub fn status(&self) -> Option<Event> {
        self.session.as_ref().map(Session::snapshot)
    }

    // ── Projects ─────────────────────────────────────────────────────

    pub fn select_project(&mut self, id: u64) -> Result<(), NotFoundError> {
        let name = self
            .store
            .get(id)
            .map(|p| p.name.clone())
            .ok_or(NotFoundError::Project(id))?;
        self.activate(id);
        self.notify(&format!("Selected project: {name} ✅"));
        Ok(())
    }

    /// Create a project, persist the set and make it active.
    pub fn create_project(&mut self, name: &str) -> Result<u64, ValidationError> {
        self.ensure_loaded();
        let project = self.store.create(name, Utc::now())?;
        let (id, name) = (project.id, project.name.clone());
        tracing::info!(id, name = %name, "project created");
        self.persist();
        self.activate(id);
        self.notify(&format!("Created project: {name} 🎉"));
        Ok(id)
    }

    /// Ask the prompter for a name, then create. `Ok(None)` when cancelled.
    pub fn create_project_interactive(&mut self) -> Result<Option<u64>, ValidationError> {
        let Some(name) = self.ports.prompter.prompt_text("New project name") else {
            return Ok(None);
        };
        self.create_project(&name).map(Some)
    }

    /// Remove a project. A missing id is a no-op returning `false`.
    pub fn delete_project(&mut self, id: u64) -> bool {
        self.ensure_loaded();
        let removed = match self.store.remove(id) {
            Ok(project) => project,
            Err(e) => {
                tracing::debug!(error = %e, "delete ignored");
                return false;
            }
        };
        if self.session.as_ref().map(Session::project_id) == Some(id) {
            if let Some(mut session) = self.session.take() {
                session.halt();
            }
        }
        tracing::info!(id, name = %removed.name, "project deleted");
        self.persist();
        self.notify(&format!("Deleted project: {} 🗑️", removed.name));
        true
    }

    /// [`delete_project`](Self::delete_project) gated on user confirmation.
    pub fn delete_project_confirmed(&mut self, id: u64) -> bool {
        let Some(name) = self.store.get(id).map(|p| p.name.clone()) else {
            return false;
        };
        if !self.ports.prompter.confirm(&format!("project \"{name}\"")) {
            return false;
        }
        self.delete_project(id)
    }

    /// Write the active session's log into its project and persist.
    pub fn save_active_project_log(&mut self) -> Result<(), PersistenceError> {
        let Some(session) = self.session.as_ref() else {
            return Ok(());
        };
        let id = session.project_id();
        if let Err(e) = self.store.replace_log(id, session.log().snapshot()) {
            tracing::warn!(error = %e, "active project vanished before save");
            return Ok(());
        }
        self.store.persist()
    }

    // ── Timer control ────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<LogEntry> {
        let entry = self.session_mut()?.start(Utc::now())?;
        tracing::debug!(elapsed = entry.time, "timer started");
        self.after_log_change();
        self.notify("Timer started ⏰");
        Some(entry)
    }

    pub fn pause(&mut self) -> Option<LogEntry> {
        let entry = self.session_mut()?.pause(Utc::now())?;
        tracing::debug!(elapsed = entry.time, "timer paused");
        self.after_log_change();
        self.notify("Paused ⏸️");
        Some(entry)
    }

    pub fn stop(&mut self) -> Option<LogEntry> {
        let entry = self.session_mut()?.stop(Utc::now())?;
        tracing::debug!(elapsed = entry.time, "timer stopped");
        self.after_log_change();
        self.notify("Stopped ⏹️ (export CSV to download)");
        Some(entry)
    }

    pub fn reset(&mut self) -> Option<Event> {
        let event = self.session_mut()?.reset()?;
        self.notify("Reset 🔄");
        Some(event)
    }

    /// Advance the clock by `secs` whole seconds, one at a time.
    pub fn advance(&mut self, secs: u64) -> Vec<Event> {
        self.advance_at(secs, Utc::now())
    }

    fn advance_at(&mut self, secs: u64, at: DateTime<Utc>) -> Vec<Event> {
        let mut events = Vec::new();
        for _ in 0..secs {
            let Some(session) = self.session.as_mut() else {
                break;
            };
            if !session.is_running() {
                break;
            }
            let outcome = session.advance_second(at);
            let elapsed_secs = session.elapsed_secs();
            if outcome.expired.is_some() {
                tracing::debug!("countdown finished");
                self.after_log_change();
                self.notify("Time's up ⏹️ (export CSV to download)");
                events.push(Event::CountdownFinished { at });
                break;
            }
            if outcome.label_requested {
                self.notify("🎯 Press 1-4 to pick a quick label!");
                events.push(Event::LabelRequested { elapsed_secs, at });
            }
        }
        events
    }

    // ── Labels & log ─────────────────────────────────────────────────

    /// Manual label request. Records nothing.
    pub fn request_label(&mut self) -> Option<Event> {
        let elapsed_secs = self.session.as_ref()?.elapsed_secs();
        self.notify("🎯 Press 1-4 to pick a quick label!");
        Some(Event::LabelRequested {
            elapsed_secs,
            at: Utc::now(),
        })
    }

    /// Record a label chosen from the catalog by its key.
    ///
    /// No active project or an unknown key: nothing is recorded.
    pub fn add_label(&mut self, key: &str) -> Option<LogEntry> {
        let Some(option) = option_for_key(key) else {
            tracing::debug!(error = %NotFoundError::LabelKey(key.to_string()), "label ignored");
            return None;
        };
        let entry = self.session_mut()?.add_label(option, Utc::now());
        self.after_log_change();
        self.notify(&format!("Added {} {}", option.emoji, option.text));
        Some(entry)
    }

    /// Keyboard shortcut path into [`add_label`](Self::add_label).
    pub fn key_pressed(&mut self, token: &str, focus: InputFocus) -> KeyOutcome {
        if focus == InputFocus::TextEntry {
            return KeyOutcome::Ignored;
        }
        let running = self.session.as_ref().is_some_and(Session::is_running);
        if !running || option_for_key(token).is_none() {
            return KeyOutcome::Unmapped;
        }
        match self.add_label(token) {
            Some(entry) => KeyOutcome::Labeled(entry),
            None => KeyOutcome::Unmapped,
        }
    }

    /// Remove any log entry. A missing id is a no-op returning `false`.
    pub fn delete_log_entry(&mut self, id: u64) -> bool {
        let Some(session) = self.session_mut() else {
            return false;
        };
        if session.remove_entry(id).is_none() {
            tracing::debug!(error = %NotFoundError::LogEntry(id), "delete ignored");
            return false;
        }
        self.after_log_change();
        self.notify("Entry deleted 🗑️");
        true
    }

    /// Remove a label entry. Ids of control events are treated as missing.
    pub fn delete_label(&mut self, id: u64) -> bool {
        let is_label = self
            .session
            .as_ref()
            .and_then(|s| s.log().get(id))
            .is_some_and(LogEntry::is_label);
        if !is_label {
            tracing::debug!(error = %NotFoundError::LogEntry(id), "label delete ignored");
            return false;
        }
        self.delete_log_entry(id)
    }

    /// [`delete_log_entry`](Self::delete_log_entry) gated on confirmation.
    pub fn delete_log_entry_confirmed(&mut self, id: u64) -> bool {
        let Some(description) = self.describe_entry(id) else {
            return false;
        };
        if !self.ports.prompter.confirm(&description) {
            return false;
        }
        self.delete_log_entry(id)
    }

    /// [`delete_label`](Self::delete_label) gated on confirmation.
    pub fn delete_label_confirmed(&mut self, id: u64) -> bool {
        let Some(description) = self.describe_entry(id) else {
            return false;
        };
        if !self.ports.prompter.confirm(&description) {
            return false;
        }
        self.delete_label(id)
    }

    // ── Settings ─────────────────────────────────────────────────────

    /// Validate and apply a partial settings change.
    ///
    /// A timer-kind change on a running timer stops it first (logged).
    pub fn change_settings(&mut self, change: SettingsChange) -> Result<(), ValidationError> {
        let next = self.settings.merged(&change)?;
        self.settings = next;
        let Some(session) = self.session.as_mut() else {
            return Ok(());
        };
        if let Some(secs) = change.interval_secs {
            session.set_interval_secs(secs);
        }
        if let Some(secs) = change.countdown_secs {
            session.set_countdown_secs(secs);
        }
        if let Some(mode) = change.mode {
            session.set_mode(mode);
        }
        let mut stopped = false;
        if let Some(kind) = change.kind {
            stopped = session.set_kind(kind, Utc::now()).is_some();
        }
        if stopped {
            self.after_log_change();
            self.notify("Timer stopped to switch timer kind");
        }
        Ok(())
    }

    // ── Export ───────────────────────────────────────────────────────

    /// Export the active session's labels through the export sink.
    ///
    /// Returns the filename, or `None` when there are no labels to export.
    pub fn export_csv(&mut self) -> Result<Option<String>, CoreError> {
        self.export_csv_on(Utc::now())
    }

    fn export_csv_on(&mut self, at: DateTime<Utc>) -> Result<Option<String>, CoreError> {
        let Some(session) = self.session.as_ref() else {
            return Ok(None);
        };
        let Some(csv) = labels_to_csv(session.log().entries()) else {
            return Ok(None);
        };
        let project_name = self.active_project().map(|p| p.name.clone());
        let filename = export_filename(project_name.as_deref(), at.date_naive());
        self.ports.exporter.export_file(csv.as_bytes(), &filename)?;
        tracing::info!(filename = %filename, "labels exported");
        self.notify("CSV exported 📁");
        Ok(Some(filename))
    }

    /// Drop the session's periodic handles. The log is already saved.
    pub fn shutdown(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.halt();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    fn activate(&mut self, id: u64) {
        if let Some(mut previous) = self.session.take() {
            previous.halt();
        }
        let Some(project) = self.store.get(id) else {
            return;
        };
        self.session = Some(Session::new(id, &self.settings, project.log.clone()));
    }

    fn describe_entry(&self, id: u64) -> Option<String> {
        let entry = self.session.as_ref()?.log().get(id)?;
        Some(format!("entry \"{}\"", entry.describe()))
    }

    /// Retry a startup load that failed before the set is mutated.
    fn ensure_loaded(&mut self) {
        if self.store.is_loaded() {
            return;
        }
        match self.store.ensure_loaded() {
            Ok(()) => tracing::info!(count = self.store.list().len(), "projects loaded on retry"),
            Err(e) => tracing::warn!(error = %e, "could not load projects"),
        }
    }

    fn after_log_change(&mut self) {
        if let Err(e) = self.save_active_project_log() {
            tracing::warn!(error = %e, "saving project log failed; will retry on next change");
            self.notify(&format!("⚠️ Could not save: {e}"));
        }
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.persist() {
            tracing::warn!(error = %e, "saving projects failed; will retry on next change");
            self.notify(&format!("⚠️ Could not save: {e}"));
        }
    }

    fn notify(&self, message: &str) {
        self.ports.notifier.notify(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::LogAction;
    use crate::ports::{ExportSink, Notifier, Prompter};
    use crate::scheduler::LabelingMode;
    use crate::storage::MemoryStorage;
    use crate::timer::TimerKind;
    use crate::STORAGE_KEY;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct Recorder {
        messages: Rc<RefCell<Vec<String>>>,
        exports: Rc<RefCell<Vec<(String, String)>>>,
        answer: Rc<RefCell<Option<String>>>,
        confirm: Rc<RefCell<bool>>,
    }

    impl Notifier for Recorder {
        fn notify(&self, message: &str) {
            self.messages.borrow_mut().push(message.to_string());
        }
    }

    impl Prompter for Recorder {
        fn prompt_text(&self, _description: &str) -> Option<String> {
            self.answer.borrow().clone()
        }

        fn confirm(&self, _entity: &str) -> bool {
            *self.confirm.borrow()
        }
    }

    impl ExportSink for Recorder {
        fn export_file(&self, bytes: &[u8], filename: &str) -> std::io::Result<()> {
            self.exports.borrow_mut().push((
                filename.to_string(),
                String::from_utf8_lossy(bytes).into_owned(),
            ));
            Ok(())
        }
    }

    impl Recorder {
        fn ports(&self) -> Ports {
            Ports {
                notifier: Box::new(self.clone()),
                prompter: Box::new(self.clone()),
                exporter: Box::new(self.clone()),
            }
        }

        fn last_message(&self) -> Option<String> {
            self.messages.borrow().last().cloned()
        }
    }

    fn coordinator<'a>(
        storage: &'a MemoryStorage,
        settings: TimerSettings,
        rec: &Recorder,
    ) -> Coordinator<&'a MemoryStorage> {
        Coordinator::new(storage, settings, rec.ports())
    }

    fn with_project<'a>(storage: &'a MemoryStorage, rec: &Recorder) -> Coordinator<&'a MemoryStorage> {
        let mut c = coordinator(storage, TimerSettings::default(), rec);
        c.create_project("Study").unwrap();
        c
    }

    #[test]
    fn starts_without_projects() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = coordinator(&storage, TimerSettings::default(), &rec);
        assert!(c.session().is_none());
        assert!(c.start().is_none());
        assert!(c.add_label("1").is_none());
        assert!(c.export_csv().unwrap().is_none());
    }

    #[test]
    fn create_activates_and_persists() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let c = with_project(&storage, &rec);
        assert_eq!(c.active_project().unwrap().name, "Study");
        assert!(storage.raw(STORAGE_KEY).unwrap().contains("Study"));
        assert_eq!(rec.last_message().as_deref(), Some("Created project: Study 🎉"));
    }

    #[test]
    fn create_rejects_duplicate() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = with_project(&storage, &rec);
        assert_eq!(
            c.create_project("STUDY"),
            Err(ValidationError::DuplicateName("Study".into()))
        );
        assert_eq!(c.projects().len(), 1);
    }

    #[test]
    fn interactive_create_honours_cancel() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = coordinator(&storage, TimerSettings::default(), &rec);
        assert_eq!(c.create_project_interactive(), Ok(None));
        *rec.answer.borrow_mut() = Some("Focus".into());
        let id = c.create_project_interactive().unwrap().unwrap();
        assert_eq!(c.active_project().unwrap().id, id);
    }

    #[test]
    fn startup_activates_first_project() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        {
            let mut c = coordinator(&storage, TimerSettings::default(), &rec);
            c.create_project("First").unwrap();
            c.create_project("Second").unwrap();
        }
        let c = coordinator(&storage, TimerSettings::default(), &rec);
        assert_eq!(c.active_project().unwrap().name, "First");
    }

    #[test]
    fn startup_prefers_remembered_project() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let second = {
            let mut c = coordinator(&storage, TimerSettings::default(), &rec);
            c.create_project("First").unwrap();
            c.create_project("Second").unwrap()
        };
        let c = Coordinator::with_active(&storage, TimerSettings::default(), rec.ports(), Some(second));
        assert_eq!(c.active_project().unwrap().name, "Second");

        let c = Coordinator::with_active(&storage, TimerSettings::default(), rec.ports(), Some(1));
        assert_eq!(c.active_project().unwrap().name, "First");
    }

    #[test]
    fn label_while_running_records_elapsed_and_saves() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = with_project(&storage, &rec);
        c.start().unwrap();
        c.advance(17);
        let before = c.session().unwrap().log().len();
        let entry = c.add_label("3").unwrap();
        assert_eq!(c.session().unwrap().log().len(), before + 1);
        assert_eq!(entry.time, 17);
        assert_eq!(rec.last_message().as_deref(), Some("Added 😣 เจ็บ"));
        assert_eq!(c.active_project().unwrap().log.len(), before + 1);
    }

    #[test]
    fn unknown_label_key_is_ignored() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = with_project(&storage, &rec);
        assert!(c.add_label("9").is_none());
        assert!(c.session().unwrap().log().is_empty());
    }

    #[test]
    fn keyboard_shortcuts() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = with_project(&storage, &rec);

        assert_eq!(c.key_pressed("1", InputFocus::Shortcut), KeyOutcome::Unmapped);

        c.start();
        assert_eq!(c.key_pressed("2", InputFocus::TextEntry), KeyOutcome::Ignored);
        assert_eq!(c.key_pressed("x", InputFocus::Shortcut), KeyOutcome::Unmapped);
        match c.key_pressed("2", InputFocus::Shortcut) {
            KeyOutcome::Labeled(entry) => assert_eq!(entry.emoji(), Some("😊")),
            other => panic!("expected a label, got {other:?}"),
        }
        assert_eq!(c.session().unwrap().labels().len(), 1);
    }

    #[test]
    fn auto_mode_requests_labels_on_interval() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = with_project(&storage, &rec);
        c.start();
        let events = c.advance(179);
        let requests = events
            .iter()
            .filter(|e| matches!(e, Event::LabelRequested { .. }))
            .count();
        assert_eq!(requests, 2);
        assert!(c.session().unwrap().labels().is_empty(), "requests record nothing");
    }

    #[test]
    fn manual_mode_never_requests() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let settings = TimerSettings {
            mode: LabelingMode::Manual,
            ..TimerSettings::default()
        };
        let mut c = coordinator(&storage, settings, &rec);
        c.create_project("Manual").unwrap();
        c.start();
        assert!(c.advance(600).is_empty());
        assert!(c.request_label().is_some());
    }

    #[test]
    fn pause_cancels_requests_and_restart_is_fresh() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = with_project(&storage, &rec);
        c.start();
        assert!(c.advance(50).is_empty());
        c.pause();
        assert!(c.advance(100).is_empty());
        c.start();
        assert!(c.advance(59).is_empty(), "no carry-over of the first 50 seconds");
        assert_eq!(c.advance(1).len(), 1);
    }

    #[test]
    fn countdown_expiry_stops_once() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let settings = TimerSettings {
            kind: TimerKind::CountDown,
            mode: LabelingMode::Manual,
            countdown_secs: 300,
            ..TimerSettings::default()
        };
        let mut c = coordinator(&storage, settings, &rec);
        c.create_project("Countdown").unwrap();
        c.start();
        let events = c.advance(300);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::CountdownFinished { .. }));

        let session = c.session().unwrap();
        assert!(!session.is_running());
        let stops: Vec<&LogEntry> = session
            .log()
            .entries()
            .iter()
            .filter(|e| e.action == LogAction::TimerStopped)
            .collect();
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].time, 0);

        assert!(c.advance(10).is_empty());
        assert_eq!(c.session().unwrap().log().len(), 2);
    }

    #[test]
    fn kind_switch_while_running_forces_stop() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = with_project(&storage, &rec);
        c.start();
        c.advance(5);
        c.change_settings(SettingsChange {
            kind: Some(TimerKind::CountDown),
            ..SettingsChange::default()
        })
        .unwrap();
        let session = c.session().unwrap();
        assert!(!session.is_running());
        assert_eq!(session.kind(), TimerKind::CountDown);
        assert_eq!(session.elapsed_secs(), 300);
        assert_eq!(
            session.log().entries().last().unwrap().action,
            LogAction::TimerStopped
        );
        assert_eq!(c.settings().kind, TimerKind::CountDown);
    }

    #[test]
    fn invalid_settings_change_is_rejected_whole() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = with_project(&storage, &rec);
        let err = c.change_settings(SettingsChange {
            interval_secs: Some(30),
            countdown_secs: Some(100_000),
            ..SettingsChange::default()
        });
        assert!(err.is_err());
        assert_eq!(c.settings().interval_secs, 60);
        assert_eq!(c.session().unwrap().interval_secs(), 60);
    }

    #[test]
    fn interval_change_while_running_applies_on_next_start() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = with_project(&storage, &rec);
        c.start();
        c.change_settings(SettingsChange {
            interval_secs: Some(10),
            ..SettingsChange::default()
        })
        .unwrap();
        assert!(c.advance(59).is_empty());
        assert_eq!(c.advance(1).len(), 1);
        c.pause();
        c.start();
        assert_eq!(c.advance(30).len(), 3);
    }

    #[test]
    fn delete_missing_entry_is_noop() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = with_project(&storage, &rec);
        c.start();
        let before = c.session().unwrap().log().snapshot();
        assert!(!c.delete_log_entry(42));
        assert!(!c.delete_label(42));
        assert_eq!(c.session().unwrap().log().snapshot(), before);
    }

    #[test]
    fn delete_label_only_touches_labels() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = with_project(&storage, &rec);
        let started = c.start().unwrap();
        let label = c.add_label("1").unwrap();
        assert!(!c.delete_label(started.id));
        assert!(c.delete_label(label.id));
        assert!(c.session().unwrap().labels().is_empty());
        assert_eq!(c.active_project().unwrap().log.len(), 1);
    }

    #[test]
    fn confirmed_deletes_respect_the_answer() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = with_project(&storage, &rec);
        c.start();
        let label = c.add_label("4").unwrap();
        assert!(!c.delete_label_confirmed(label.id));
        *rec.confirm.borrow_mut() = true;
        assert!(c.delete_label_confirmed(label.id));

        let id = c.active_project().unwrap().id;
        *rec.confirm.borrow_mut() = false;
        assert!(!c.delete_project_confirmed(id));
        *rec.confirm.borrow_mut() = true;
        assert!(c.delete_project_confirmed(id));
        assert!(c.session().is_none());
    }

    #[test]
    fn deleting_active_project_clears_session() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = with_project(&storage, &rec);
        c.start();
        let id = c.active_project().unwrap().id;
        assert!(c.delete_project(id));
        assert!(c.session().is_none());
        assert!(c.advance(5).is_empty());
        assert!(!c.delete_project(id));
    }

    #[test]
    fn switching_project_rebuilds_session_from_log() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = with_project(&storage, &rec);
        let first = c.active_project().unwrap().id;
        c.start();
        c.add_label("2");
        c.create_project("Other").unwrap();
        let session = c.session().unwrap();
        assert!(!session.is_running());
        assert!(session.log().is_empty());

        c.select_project(first).unwrap();
        assert_eq!(c.session().unwrap().labels().len(), 1);
        assert_eq!(c.select_project(12), Err(NotFoundError::Project(12)));
    }

    #[test]
    fn persistence_failure_keeps_timer_running() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = with_project(&storage, &rec);
        c.start();
        storage.set_failing(true);
        let entry = c.add_label("1").unwrap();
        assert!(rec.last_message().unwrap().starts_with("Added"));
        assert!(rec
            .messages
            .borrow()
            .iter()
            .any(|m| m.starts_with("⚠️ Could not save")));
        assert!(c.session().unwrap().is_running());
        c.advance(3);
        assert_eq!(c.session().unwrap().elapsed_secs(), 3);

        storage.set_failing(false);
        c.add_label("2");
        let raw = storage.raw(STORAGE_KEY).unwrap();
        assert!(raw.contains(&entry.id.to_string()), "retry writes the full snapshot");
    }

    #[test]
    fn export_hands_csv_to_sink() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        let mut c = with_project(&storage, &rec);
        assert!(c.export_csv().unwrap().is_none());
        assert!(rec.exports.borrow().is_empty());

        c.start();
        c.advance(5);
        c.add_label("2");
        let at = Utc::now();
        let filename = c.export_csv_on(at).unwrap().unwrap();
        assert_eq!(
            filename,
            format!("Study_labels_{}.csv", at.format("%Y-%m-%d"))
        );
        let exports = rec.exports.borrow();
        assert_eq!(exports.len(), 1);
        assert_eq!(exports[0].1.lines().count(), 2);
    }

    #[test]
    fn corrupt_store_is_reported_not_fatal() {
        let storage = MemoryStorage::with_value(STORAGE_KEY, "oops");
        let rec = Recorder::default();
        let c = coordinator(&storage, TimerSettings::default(), &rec);
        assert!(c.projects().is_empty());
        assert!(rec.last_message().unwrap().starts_with("⚠️ Could not load projects"));
    }

    #[test]
    fn failed_startup_load_does_not_overwrite_stored_projects() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        with_project(&storage, &rec);

        storage.set_failing(true);
        let mut c = coordinator(&storage, TimerSettings::default(), &rec);
        assert!(c.projects().is_empty());
        storage.set_failing(false);

        assert_eq!(
            c.create_project("study"),
            Err(ValidationError::DuplicateName("Study".into()))
        );
        c.create_project("New").unwrap();
        let raw = storage.raw(STORAGE_KEY).unwrap();
        assert!(raw.contains("Study"));
        assert!(raw.contains("New"));
        assert_eq!(c.projects().len(), 2);
    }

    #[test]
    fn store_still_offline_refuses_to_write() {
        let storage = MemoryStorage::new();
        let rec = Recorder::default();
        with_project(&storage, &rec);

        storage.set_failing(true);
        let mut c = coordinator(&storage, TimerSettings::default(), &rec);
        c.create_project("New").unwrap();
        assert!(rec.last_message().unwrap().starts_with("Created project"));
        assert!(rec
            .messages
            .borrow()
            .iter()
            .any(|m| m.starts_with("⚠️ Could not save")));
        storage.set_failing(false);
        let raw = storage.raw(STORAGE_KEY).unwrap();
        assert!(raw.contains("Study"));
        assert!(!raw.contains("New"));
    }
}
