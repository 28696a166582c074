// gui/components/parameters.rs
use crate::config::{MatchParams, Threshold};
use crate::gui::hooks::{AppSession, UiSignals};
use crate::template_matching::MatchMethod;
use dioxus::prelude::*;

#[derive(Props, PartialEq, Clone)]
pub struct ParametersProps {
    pub params: MatchParams,
    pub signals: UiSignals,
}

#[component]
pub fn Parameters(props: ParametersProps) -> Element {
    let session = use_context::<AppSession>();
    let session_for_method = session.clone();
    let signals = props.signals;
    let threshold = props.params.threshold;
    let current = props.params.method;
    let percent = threshold.percent_label();
    let (min, max, step) = (Threshold::MIN, Threshold::MAX, Threshold::STEP);
    let value = threshold.value();
    let options = MatchMethod::ALL.map(|method| {
        let text = if method == MatchMethod::default() {
            format!("{} (Recommended)", method.label())
        } else {
            method.label().to_string()
        };
        (method, text)
    });

    rsx! {
        div { style: "background: rgba(255,255,255,0.1); padding: 12px; border-radius: 15px; border: 1px solid rgba(255,255,255,0.2); display:flex; flex-direction:column; gap:10px;",
            h3 { style: "margin:0; font-size:0.95em; color:#87ceeb;", "⚙️ Template Matching Parameters" }
            label { style: "display:flex; flex-direction:column; gap:4px; font-size:0.85em;",
                "Match Threshold: {percent}%"
                input {
                    r#type: "range",
                    min: "{min}",
                    max: "{max}",
                    step: "{step}",
                    value: "{value}",
                    style: "width:100%; cursor:pointer;",
                    oninput: move |evt| {
                        let session = session.clone();
                        async move {
                            let Ok(value) = evt.value().parse::<f32>() else { return };
                            match Threshold::new(value) {
                                Ok(threshold) => {
                                    session.lock().await.set_threshold(threshold);
                                    signals.refresh(&session).await;
                                }
                                Err(e) => log::debug!("Ignoring slider value: {}", e),
                            }
                        }
                    }
                }
                span { style: "font-size:0.75em; opacity:0.7;", "Higher values require closer matches" }
            }
            label { style: "display:flex; flex-direction:column; gap:4px; font-size:0.85em;",
                "Matching Method"
                select {
                    style: "padding:6px; border-radius:6px; border:1px solid rgba(255,255,255,0.3); background:rgba(0,0,0,0.25); color:white;",
                    onchange: move |evt| {
                        let session = session_for_method.clone();
                        async move {
                            match evt.value().parse::<MatchMethod>() {
                                Ok(method) => {
                                    session.lock().await.set_method(method);
                                    signals.refresh(&session).await;
                                }
                                Err(e) => signals.set_status(format!("❌ {}", e)),
                            }
                        }
                    },
                    for (method, text) in options {
                        option { value: method.slug(), selected: method == current, "{text}" }
                    }
                }
            }
        }
    }
}
