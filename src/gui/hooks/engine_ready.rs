use super::types::{AppSession, UiSignals};
use crate::template_matching::EngineReadiness;
use dioxus::prelude::*;

/// Waits once for the matcher self-test and updates the status line.
pub fn use_engine_ready(engine: EngineReadiness, session: AppSession, signals: UiSignals) {
    use_future(move || {
        let engine = engine.clone();
        let session = session.clone();
        async move {
            match engine.wait_ready().await {
                Ok(()) => signals.set_status("✅ Matcher ready"),
                Err(e) => signals.set_status(format!("❌ {}", e.user_message())),
            }
            signals.refresh(&session).await;
        }
    });
}
