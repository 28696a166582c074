use crate::config::CameraConfig;
use crate::gui::components::{
    actions::Actions, capture_panel::CapturePanel, header::Header, parameters::Parameters,
    results::Results, status_badges::StatusBadges, template_preview::TemplatePreview,
};
use crate::gui::hooks::{AppSession, UiSignals, use_camera_preview, use_engine_ready};
use crate::media::CameraBackend;
use crate::session::{Session, SessionSnapshot};
use crate::template_matching::EngineReadiness;
use dioxus::prelude::*;
use std::sync::Arc;
use tokio::sync::Mutex;

pub fn run_gui(camera: CameraConfig) {
    use dioxus::desktop::{Config, WindowBuilder};
    let enable_borderless = true; // borderless window
    let config = Config::new().with_window(
        WindowBuilder::new()
            .with_title("Fight Stats Analyzer")
            .with_decorations(!enable_borderless) // false => no native title/menu
            .with_resizable(true)
            .with_inner_size(dioxus::desktop::LogicalSize::new(1100, 760)),
    );
    dioxus::LaunchBuilder::desktop()
        .with_cfg(config)
        .with_context(camera)
        .launch(App);
}

#[component]
fn App() -> Element {
    use dioxus::desktop::use_window; // access desktop window for dragging
    let desktop = use_window();
    let camera_config = use_context::<CameraConfig>();

    let engine = use_hook(EngineReadiness::spawn);
    let session: AppSession = use_context_provider(|| {
        let camera = CameraBackend::from_config(&camera_config);
        Arc::new(Mutex::new(Session::new(camera, engine.clone())))
    });

    let signals = UiSignals {
        snapshot: use_signal(SessionSnapshot::default),
        status: use_signal(|| "⏳ Loading matcher...".to_string()),
        preview: use_signal(|| None::<String>),
        pending: use_signal(|| false),
    };
    use_engine_ready(engine, session.clone(), signals);
    use_camera_preview(session.clone(), signals);

    let snapshot = signals.snapshot.read().clone();
    let preview = signals.preview.read().clone();
    let status = signals.status.read().clone();
    let camera_active = snapshot.phase == crate::session::SessionPhase::CameraActive;
    let facing_label = snapshot.facing.toggled().label().to_string();
    let switch_session = session.clone();

    rsx! {
        // Main app container: vertical layout, fills viewport
        div { style: "height:97vh; display:flex; flex-direction:column; background:linear-gradient(135deg,#667eea 0%,#764ba2 100%); color:white; border:1px solid rgba(255,255,255,0.25); box-sizing:content-box;",
            // Scrollable content area
            div { style: "flex:1; overflow:auto; padding:8px;",
                // Horizontal split: left (controls), right (image)
                div { style: "display:flex; gap:14px; align-items:flex-start;",
                    // Left column: header, badges, actions, template, parameters, results
                    div { style: "flex:1; min-width:0; display:flex; flex-direction:column; gap:10px;",
                        Header {
                            camera_active: camera_active,
                            facing_label: facing_label,
                            on_switch_facing: move |_| {
                                let session = switch_session.clone();
                                spawn(async move {
                                    let result = session.lock().await.switch_facing().await;
                                    signals.report(&result, |facing| format!("🔄 Switched to {} camera", facing.label()));
                                    signals.refresh(&session).await;
                                });
                            },
                            on_drag: move |_| { let _ = desktop.window.drag_window(); },
                        }
                        StatusBadges { snapshot: snapshot.clone() }
                        // Status line for user-visible errors and progress
                        div { style: "background:rgba(0,0,0,0.2); padding:6px 10px; border-radius:8px; font-size:0.85em; min-height:1.2em;", "{status}" }
                        Actions { snapshot: snapshot.clone(), signals: signals }
                        TemplatePreview { template: snapshot.template.clone(), signals: signals }
                        Parameters { params: snapshot.params, signals: signals }
                        Results { outcome: snapshot.outcome.clone() }
                        // Credits/footer
                        div { style: "margin-top:4px; text-align:left; font-size:0.7em; opacity:0.75; letter-spacing:0.5px;", "Built with Rust 🦀 and Dioxus ⚛️" }
                    }
                    // Right column: preview, captured or annotated image
                    CapturePanel { snapshot: snapshot.clone(), preview: preview }
                }
            }
        }
    }
}
