//! Injected logging capability.
//!
//! The annotator reports status through a small trait instead of a global
//! logger, so embedders decide where the lines go. Status lines are never
//! part of the data stream.

/// Destination for human-readable status lines.
pub trait StatusLog {
    /// An informational status line (e.g. an accepted format change).
    fn info(&self, message: &str);

    /// An error status line (e.g. an unrecognized format name).
    fn error(&self, message: &str);
}

/// A shared log can be handed to the annotator while the owner keeps a
/// handle for inspection.
impl<T: StatusLog + ?Sized> StatusLog for std::sync::Arc<T> {
    fn info(&self, message: &str) {
        (**self).info(message);
    }

    fn error(&self, message: &str) {
        (**self).error(message);
    }
}

/// Production log backed by the `tracing` ecosystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLog;

impl StatusLog for TracingLog {
    fn info(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

/// A log that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLog;

impl StatusLog for NullLog {
    fn info(&self, _message: &str) {}

    fn error(&self, _message: &str) {}
}
