//! User-visible status reporting.

use log::{info, warn};
use std::sync::Arc;

/// One status message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Progress(String),
    Success(String),
    /// The single notice emitted when a whole operation fails.
    Failure(String),
}

/// Receives the loading indicator state and notices.
pub trait StatusSink: Send + Sync {
    fn set_loading(&self, loading: bool);
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log. The default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatus;

impl StatusSink for LogStatus {
    fn set_loading(&self, _loading: bool) {}

    fn notify(&self, notice: Notice) {
        match notice {
            Notice::Progress(msg) | Notice::Success(msg) => info!("{}", msg),
            Notice::Failure(msg) => warn!("{}", msg),
        }
    }
}

/// Shows the loading indicator for as long as it lives. Dropping it clears
/// the indicator on every exit path, early returns and `?` included.
pub struct LoadingGuard {
    sink: Arc<dyn StatusSink>,
}

impl LoadingGuard {
    pub fn start(sink: &Arc<dyn StatusSink>, message: impl Into<String>) -> Self {
        sink.set_loading(true);
        sink.notify(Notice::Progress(message.into()));
        Self { sink: Arc::clone(sink) }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.sink.set_loading(false);
    }
}
