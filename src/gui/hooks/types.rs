use crate::error::AnalyzerResult;
use crate::media::CameraBackend;
use crate::session::{SessionSnapshot, SharedSession};
use dioxus::prelude::*;

/// Session shared by every component, provided through context.
pub type AppSession = SharedSession<CameraBackend>;

/// Signals the components render from, grouped to keep props small.
#[derive(Clone, Copy, PartialEq)]
pub struct UiSignals {
    pub snapshot: Signal<SessionSnapshot>, // Last copy of session state
    pub status: Signal<String>,            // Status line
    pub preview: Signal<Option<String>>,   // Live camera frame as data URL
    pub pending: Signal<bool>,             // A camera or file action is in flight
}

impl UiSignals {
    /// Copy the session state into the snapshot signal.
    pub async fn refresh(mut self, session: &AppSession) {
        let snapshot = session.lock().await.snapshot();
        if snapshot.phase != crate::session::SessionPhase::CameraActive {
            self.preview.set(None);
        }
        self.snapshot.set(snapshot);
    }

    /// Show `ok` on success or the error's user message on failure.
    /// Blocked preconditions are logged only.
    pub fn report<T>(mut self, result: &AnalyzerResult<T>, ok: impl FnOnce(&T) -> String) {
        match result {
            Ok(value) => self.status.set(ok(value)),
            Err(e) if e.is_blocking() => log::debug!("Blocked action: {}", e),
            Err(e) if e.is_camera_error() => self.status.set(format!("📷 {}", e.user_message())),
            Err(e) => self.status.set(format!("❌ {}", e.user_message())),
        }
    }

    pub fn set_status(mut self, message: impl Into<String>) {
        self.status.set(message.into());
    }
}
