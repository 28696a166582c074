// gui/components/template_preview.rs
use crate::gui::hooks::{AppSession, UiSignals};
use crate::gui::util::raster_data_url;
use crate::media::TemplateImage;
use dioxus::prelude::*;

#[derive(Props, PartialEq, Clone)]
pub struct TemplatePreviewProps {
    #[props(!optional)]
    pub template: Option<TemplateImage>,
    pub signals: UiSignals,
}

#[component]
pub fn TemplatePreview(props: TemplatePreviewProps) -> Element {
    let session = use_context::<AppSession>();
    let signals = props.signals;
    let Some(template) = props.template.as_ref() else {
        return rsx! {};
    };
    let src = raster_data_url(template.raster());
    let size = format!("{}x{}", template.width(), template.height());

    rsx! {
        div { style: "background: rgba(255,255,255,0.1); padding: 12px; border-radius: 15px; border: 1px solid rgba(255,255,255,0.2);",
            h3 { style: "margin:0 0 8px; font-size:0.95em; color:#87ceeb;", "🧩 Template Image" }
            if let Some(src) = src {
                img { src: "{src}", style: "max-width:100%; max-height:120px; border-radius:6px; border:2px solid rgba(255,255,255,0.25);" }
            }
            div { style: "display:flex; align-items:center; justify-content:space-between; margin-top:6px; font-size:0.8em;",
                span { style: "opacity:0.8;", "{size}" }
                button { style: "background: rgba(255,255,255,0.15); color:#fff; border:1px solid rgba(255,255,255,0.3); padding:3px 8px; border-radius:5px; cursor:pointer;",
                    onclick: move |_| {
                        let session = session.clone();
                        async move {
                            session.lock().await.clear_template();
                            signals.set_status("🧩 Template cleared");
                            signals.refresh(&session).await;
                        }
                    },
                    "✖ Clear"
                }
            }
        }
    }
}
