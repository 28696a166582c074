// gui/components/results.rs
use crate::session::AnalysisOutcome;
use dioxus::prelude::*;

#[component]
pub fn Results(#[props(!optional)] outcome: Option<AnalysisOutcome>) -> Element {
    let Some(outcome) = outcome else {
        return rsx! {};
    };

    match outcome {
        AnalysisOutcome::Failed(message) => rsx! {
            div { style: "background:#5a1f1f; border:1px solid #ff6262; color:#ffb3b3; padding:12px; border-radius:12px;",
                h3 { style: "margin:0 0 6px; font-size:1em;", "❌ Analysis Error" }
                p { style: "margin:0; font-size:0.85em;", "{message}" }
            }
        },
        AnalysisOutcome::Matched(analysis) => {
            let summary = analysis.summary;
            let (style, title) = if summary.found {
                ("background:#1f5130; border:1px solid #48ff9b;", "✅ Template Found")
            } else {
                ("background:#5a4b1f; border:1px solid #ffd857;", "⚠️ Template Not Found")
            };
            let location = format!("({}, {})", summary.location.x, summary.location.y);
            let image_size = format!("{}x{}", summary.image_size.width, summary.image_size.height);
            let template_size = summary
                .template_size
                .map(|s| format!("{}x{}", s.width, s.height));
            let method = summary.method.label();
            let threshold = summary.threshold.percent_label();
            let message = summary.message;
            let confidence = summary.confidence;

            rsx! {
                div { style: "{style} padding:12px; border-radius:12px; font-size:0.85em;",
                    h3 { style: "margin:0 0 6px; font-size:1em;", "{title}" }
                    p { style: "margin:0 0 8px;", "{message}" }
                    div { style: "display:grid; grid-template-columns:auto 1fr; gap:2px 12px; opacity:0.9;",
                        span { "Confidence:" } span { "{confidence}%" }
                        span { "Location:" } span { "{location}" }
                        span { "Image size:" } span { "{image_size}" }
                        if let Some(template_size) = template_size {
                            span { "Template size:" } span { "{template_size}" }
                        }
                        span { "Method:" } span { "{method}" }
                        span { "Threshold:" } span { "{threshold}%" }
                    }
                }
            }
        }
    }
}
