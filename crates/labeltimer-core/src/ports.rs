//! Capabilities the coordinator needs from its surroundings.
//!
//! The presentation layer implements these; the core only calls them and
//! stays synchronous. Every method has a harmless default so a caller that
//! has no use for, say, exports can skip implementing it.

/// Fire-and-forget status messages ("toasts").
pub trait Notifier {
    fn notify(&self, _message: &str) {}
}

/// Text prompts and yes/no confirmations.
pub trait Prompter {
    /// Ask for a line of text. `None` means the user cancelled.
    fn prompt_text(&self, _description: &str) -> Option<String> {
        None
    }

    /// Ask the user to confirm a destructive action on `entity`.
    fn confirm(&self, _entity: &str) -> bool {
        false
    }
}

/// Receives a finished export file.
pub trait ExportSink {
    fn export_file(&self, bytes: &[u8], filename: &str) -> std::io::Result<()>;
}

/// Bundle of the three capabilities handed to a coordinator.
pub struct Ports {
    pub notifier: Box<dyn Notifier>,
    pub prompter: Box<dyn Prompter>,
    pub exporter: Box<dyn ExportSink>,
}

/// Does nothing: no messages, every prompt cancelled, exports discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct Headless;

impl Notifier for Headless {}

impl Prompter for Headless {}

impl ExportSink for Headless {
    fn export_file(&self, _bytes: &[u8], filename: &str) -> std::io::Result<()> {
        tracing::debug!(filename, "export discarded by headless sink");
        Ok(())
    }
}

impl Default for Ports {
    fn default() -> Self {
        Self {
            notifier: Box::new(Headless),
            prompter: Box::new(Headless),
            exporter: Box::new(Headless),
        }
    }
}
