// gui/components/actions.rs
use crate::gui::hooks::{AppSession, UiSignals};
use crate::gui::util::timestamp;
use crate::session::{AnalysisOutcome, SessionPhase, SessionSnapshot};
use dioxus::prelude::*;

const PRIMARY: &str = "background:linear-gradient(45deg,#28a745,#20c997); color:white; padding:12px 20px; border:none; border-radius:10px; cursor:pointer; font-size:1em; font-weight:bold; min-width:140px;";
const SECONDARY: &str = "background:linear-gradient(45deg,#007bff,#0056b3); color:white; padding:12px 20px; border:none; border-radius:10px; cursor:pointer; font-size:1em; font-weight:bold; min-width:140px; display:inline-block; text-align:center;";
const PURPLE: &str = "background:linear-gradient(45deg,#6f42c1,#563d7c); color:white; padding:12px 20px; border:none; border-radius:10px; cursor:pointer; font-size:1em; font-weight:bold; min-width:140px;";
const DANGER: &str = "background:linear-gradient(45deg,#dc3545,#e74c3c); color:white; padding:12px 20px; border:none; border-radius:10px; cursor:pointer; font-size:1em; font-weight:bold; min-width:140px;";
const DISABLED: &str = "background:#6c757d; color:#ddd; padding:12px 20px; border:none; border-radius:10px; cursor:not-allowed; font-size:1em; font-weight:bold; min-width:140px; opacity:0.7;";
const BUSY: &str = "background:linear-gradient(45deg,#ff6b35,#f7931e); color:white; padding:12px 20px; border:none; border-radius:10px; cursor:wait; font-size:1em; font-weight:bold; min-width:140px; animation:pulse 1.5s infinite;";

/// Bytes, declared MIME type and name of the first selected file.
async fn read_first_file(evt: &FormEvent) -> Option<Result<(Vec<u8>, Option<String>, String), String>> {
    let file = evt.files().into_iter().next()?;
    let name = file.name();
    let mime = file.content_type();
    Some(
        file.read_bytes()
            .await
            .map(|bytes| (bytes.to_vec(), mime, name.clone()))
            .map_err(|e| format!("Failed to read {}: {}", name, e)),
    )
}

#[derive(Props, PartialEq, Clone)]
pub struct ActionsProps {
    pub snapshot: SessionSnapshot,
    pub signals: UiSignals,
}

#[component]
pub fn Actions(props: ActionsProps) -> Element {
    let session = use_context::<AppSession>();
    let signals = props.signals;
    let mut pending = signals.pending;
    let snapshot = &props.snapshot;
    let phase = snapshot.phase;
    let is_pending = *pending.read();
    let has_source = snapshot.source.is_some();

    let annotated_png = match &snapshot.outcome {
        Some(AnalysisOutcome::Matched(analysis)) => Some(analysis.annotated.clone()),
        _ => None,
    };
    let (analyze_style, analyze_label) = if phase == SessionPhase::Processing {
        (BUSY, "🔍 Processing...")
    } else if snapshot.template.is_none() {
        (DISABLED, "🧩 Load Template First")
    } else if !snapshot.engine_ready {
        (DISABLED, "⏳ Loading Matcher...")
    } else if snapshot.can_analyze {
        (PRIMARY, "🔍 Analyze Image")
    } else {
        (DISABLED, "🔍 Analyze Image")
    };
    let can_analyze = snapshot.can_analyze;

    let start_session = session.clone();
    let capture_session = session.clone();
    let upload_session = session.clone();
    let template_session = session.clone();
    let analyze_session = session.clone();
    let retake_session = session.clone();
    let reset_session = session.clone();

    rsx! {
        div { style: "background: rgba(255,255,255,0.1); backdrop-filter: blur(10px); padding: 16px; border-radius: 15px; border: 1px solid rgba(255,255,255,0.2);",
            h2 { style: "margin-top:0; color:#87ceeb; font-size:1.1em;", "🎮 Actions" }
            div { style: "display:flex; gap:12px; flex-wrap:wrap; justify-content:center;",
                if phase == SessionPhase::Idle {
                    button { style: if is_pending { BUSY } else { PRIMARY }, disabled: is_pending,
                        onclick: move |_| {
                            let session = start_session.clone();
                            async move {
                                pending.set(true);
                                signals.set_status("📷 Starting camera...");
                                let result = session.lock().await.start_camera().await;
                                signals.report(&result, |_| "📷 Camera started".to_string());
                                pending.set(false);
                                signals.refresh(&session).await;
                            }
                        },
                        if is_pending { "⏳ Starting..." } else { "📷 Start Camera" }
                    }
                }
                if phase == SessionPhase::CameraActive {
                    button { style: if is_pending { BUSY } else { PRIMARY }, disabled: is_pending,
                        onclick: move |_| {
                            let session = capture_session.clone();
                            async move {
                                pending.set(true);
                                let result = session.lock().await.capture().await;
                                signals.report(&result, |_| "📸 Picture taken".to_string());
                                pending.set(false);
                                signals.refresh(&session).await;
                            }
                        },
                        "📸 Take Picture"
                    }
                }
                if phase != SessionPhase::Processing {
                    label { style: SECONDARY,
                        "📁 Upload Image"
                        input { r#type: "file", accept: "image/*", style: "display:none;",
                            onchange: move |evt| {
                                let session = upload_session.clone();
                                async move {
                                    match read_first_file(&evt).await {
                                        Some(Ok((bytes, mime, name))) => {
                                            let result = session.lock().await.upload_source(&bytes, mime.as_deref());
                                            signals.report(&result, |_| format!("🖼️ Loaded {}", name));
                                        }
                                        Some(Err(e)) => signals.set_status(format!("❌ {}", e)),
                                        None => {}
                                    }
                                    signals.refresh(&session).await;
                                }
                            }
                        }
                    }
                }
                label { style: SECONDARY,
                    if snapshot.template.is_some() { "🧩 Change Template" } else { "🧩 Load Template" }
                    input { r#type: "file", accept: "image/*", style: "display:none;",
                        onchange: move |evt| {
                            let session = template_session.clone();
                            async move {
                                match read_first_file(&evt).await {
                                    Some(Ok((bytes, mime, name))) => {
                                        let result = session.lock().await.load_template(&bytes, mime.as_deref());
                                        signals.report(&result, |_| format!("🧩 Template {} loaded", name));
                                    }
                                    Some(Err(e)) => signals.set_status(format!("❌ {}", e)),
                                    None => {}
                                }
                                signals.refresh(&session).await;
                            }
                        }
                    }
                }
                if has_source {
                    button { style: analyze_style, disabled: !can_analyze,
                        onclick: move |_| {
                            let session = analyze_session.clone();
                            async move {
                                let request = session.lock().await.begin_analysis();
                                let request = match request {
                                    Ok(request) => request,
                                    Err(e) => {
                                        if !e.is_blocking() {
                                            signals.set_status(format!("❌ {}", e.user_message()));
                                        }
                                        return;
                                    }
                                };
                                signals.set_status("🔍 Analyzing...");
                                signals.refresh(&session).await;

                                let generation = request.generation;
                                let outcome = AnalysisOutcome::from_result(&request.run().await);
                                let message = match &outcome {
                                    AnalysisOutcome::Matched(a) => {
                                        format!("{} {}", if a.summary.found { "✅" } else { "⚠️" }, a.summary.message)
                                    }
                                    AnalysisOutcome::Failed(e) => format!("❌ {}", e),
                                };
                                if session.lock().await.finish_analysis(generation, outcome) {
                                    signals.set_status(message);
                                }
                                signals.refresh(&session).await;
                            }
                        },
                        "{analyze_label}"
                    }
                    button { style: PURPLE,
                        onclick: move |_| {
                            let session = retake_session.clone();
                            async move {
                                let result = session.lock().await.retake().await;
                                signals.report(&result, |_| "↩️ Retake: camera restarted".to_string());
                                signals.refresh(&session).await;
                            }
                        },
                        "↩️ Retake"
                    }
                }
                if let Some(annotated) = annotated_png {
                    button { style: PURPLE,
                        onclick: move |_| {
                            let annotated = annotated.clone();
                            async move {
                                let filename = format!("annotated_{}.png", timestamp());
                                let result = match annotated.encode_png() {
                                    Ok(png) => tokio::fs::write(&filename, png.as_slice())
                                        .await
                                        .map_err(|e| format!("Failed to save: {}", e)),
                                    Err(e) => Err(e.to_string()),
                                };
                                match result {
                                    Ok(()) => signals.set_status(format!("✅ Annotated image saved to {}", filename)),
                                    Err(e) => signals.set_status(format!("❌ {}", e)),
                                }
                            }
                        },
                        "💾 Save Annotated"
                    }
                }
                button { style: DANGER,
                    onclick: move |_| {
                        let session = reset_session.clone();
                        async move {
                            session.lock().await.reset();
                            signals.set_status("🔄 Reset");
                            signals.refresh(&session).await;
                        }
                    },
                    "🔄 Reset"
                }
            }
        }
    }
}
