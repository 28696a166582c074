use super::types::{AppSession, UiSignals};
use crate::gui::util::data_url;
use crate::session::SessionPhase;
use dioxus::prelude::*;
use std::time::Duration;

const PREVIEW_INTERVAL: Duration = Duration::from_millis(150);

/// Polls the active stream for preview frames while the camera is on.
pub fn use_camera_preview(session: AppSession, signals: UiSignals) {
    use_future(move || {
        let session = session.clone();
        let mut preview = signals.preview;
        async move {
            let mut failures = 0u32;
            loop {
                tokio::time::sleep(PREVIEW_INTERVAL).await;
                if signals.snapshot.peek().phase != SessionPhase::CameraActive {
                    failures = 0;
                    continue;
                }
                let frame = session.lock().await.preview_frame().await;
                match frame {
                    Ok(Some(frame)) => {
                        failures = 0;
                        preview.set(Some(data_url(frame.mime, &frame.bytes)));
                    }
                    Ok(None) => {}
                    Err(e) => {
                        failures += 1;
                        // one warning per failure streak
                        if failures == 1 {
                            log::warn!("⚠️ Preview frame failed: {}", e);
                            signals.set_status(format!("⚠️ {}", e.user_message()));
                        }
                    }
                }
            }
        }
    });
}
