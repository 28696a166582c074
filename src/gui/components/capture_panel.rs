// gui/components/capture_panel.rs
use crate::gui::util::raster_data_url;
use crate::session::{AnalysisOutcome, SessionPhase, SessionSnapshot};
use dioxus::prelude::*;

#[derive(Props, PartialEq, Clone)]
pub struct CapturePanelProps {
    pub snapshot: SessionSnapshot,
    #[props(!optional)]
    pub preview: Option<String>,
}

/// Live preview while the camera runs, otherwise the annotated result or the
/// captured image.
#[component]
pub fn CapturePanel(props: CapturePanelProps) -> Element {
    let snapshot = &props.snapshot;
    let annotated = match &snapshot.outcome {
        Some(AnalysisOutcome::Matched(analysis)) => raster_data_url(analysis.annotated.raster()),
        _ => None,
    };
    let source = snapshot.source.as_ref().and_then(|s| raster_data_url(s.raster()));
    let processing = snapshot.phase == SessionPhase::Processing;

    let (image, caption) = if snapshot.phase == SessionPhase::CameraActive {
        (props.preview.clone(), "📷 Live camera")
    } else if annotated.is_some() {
        (annotated, "🎯 Analysis result")
    } else if source.is_some() {
        (source, "🖼️ Captured image")
    } else {
        (None, "")
    };

    rsx! {
        div { style: "background: rgba(255,255,255,0.1); backdrop-filter: blur(10px); padding: 12px; border-radius: 15px; border: 1px solid rgba(255,255,255,0.2); min-width:420px; max-width:640px;",
            if let Some(src) = image {
                div { style: "position:relative;",
                    img { src: "{src}", style: "max-width:100%; max-height:480px; border-radius:8px; border:4px solid rgba(255,255,255,0.25); display:block; margin:0 auto;" }
                    if processing {
                        div { style: "position:absolute; inset:0; display:flex; align-items:center; justify-content:center; background:rgba(0,0,0,0.45); border-radius:8px; font-size:1.2em; font-weight:bold;", "🔍 Processing..." }
                    }
                }
                p { style: "margin:6px 0 0; text-align:center; font-size:0.8em; opacity:0.8;", "{caption}" }
            } else if snapshot.phase == SessionPhase::CameraActive {
                div { style: "height:320px; display:flex; align-items:center; justify-content:center; opacity:0.8;", "⏳ Starting camera..." }
            } else {
                div { style: "height:320px; display:flex; flex-direction:column; align-items:center; justify-content:center; gap:10px; opacity:0.8;",
                    span { style: "font-size:3em;", "📷" }
                    span { "Start the camera or upload an image to begin" }
                }
            }
        }
    }
}
