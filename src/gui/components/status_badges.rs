// gui/components/status_badges.rs
use crate::session::SessionSnapshot;
use dioxus::prelude::*;

const OK: &str = "background: #1f5130; color: #48ff9b; border: 1px solid #48ff9b; padding: 4px 10px; border-radius: 16px; font-size: 0.75em; letter-spacing: 0.5px; font-weight: 600;";
const WAIT: &str = "background: #5a4b1f; color: #ffd857; border: 1px solid #ffd857; padding: 4px 10px; border-radius: 16px; font-size: 0.75em; letter-spacing: 0.5px; font-weight: 600;";
const INFO: &str = "background: #1f3a5a; color: #87ceeb; border: 1px solid #87ceeb; padding: 4px 10px; border-radius: 16px; font-size: 0.75em; letter-spacing: 0.5px; font-weight: 600;";

#[component]
pub fn StatusBadges(snapshot: SessionSnapshot) -> Element {
    let (engine_style, engine_label) = if snapshot.engine_ready {
        (OK, "✅ Matcher ready")
    } else {
        (WAIT, "⏳ Loading matcher...")
    };
    let (template_style, template_label) = if snapshot.template.is_some() {
        (OK, "🧩 Template loaded")
    } else {
        (WAIT, "🧩 No template")
    };
    let camera_label = format!("📷 {} ({})", snapshot.facing.label(), snapshot.camera_name);
    let phase_label = snapshot.phase.label();

    rsx! {
        div { style: "display:flex; gap:8px; flex-wrap:wrap;",
            span { style: engine_style, "{engine_label}" }
            span { style: template_style, "{template_label}" }
            span { style: INFO, "{camera_label}" }
            span { style: INFO, "{phase_label}" }
        }
    }
}
