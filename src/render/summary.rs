use crate::config::Threshold;
use crate::media::ImageSize;
use crate::template_matching::{MatchLocation, MatchMethod, RawMatch};
use serde::Serialize;

/// Strictly greater: a score equal to the threshold is not a match.
pub fn is_found(score: f32, threshold: Threshold) -> bool {
    score > threshold.value()
}

/// Structured outcome shown in the results panel and printed by `--json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub found: bool,
    /// Score as a percentage with two decimals, e.g. `"85.00"`
    pub confidence: String,
    /// Best location, reported whether or not the threshold was met
    pub location: MatchLocation,
    pub message: String,
    pub image_size: ImageSize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_size: Option<ImageSize>,
    pub method: MatchMethod,
    pub threshold: Threshold,
    pub raw_score: f32,
}

impl MatchSummary {
    pub fn from_match(raw: &RawMatch, threshold: Threshold) -> Self {
        let found = is_found(raw.score, threshold);
        let confidence = format!("{:.2}", raw.score * 100.0);
        let message = if found {
            format!(
                "Template found with {}% confidence at position ({}, {})",
                confidence, raw.location.x, raw.location.y
            )
        } else {
            format!(
                "Template not found. Best match: {}% confidence (threshold: {}%)",
                confidence,
                threshold.percent_label()
            )
        };

        Self {
            found,
            confidence,
            location: raw.location,
            message,
            image_size: raw.source_size,
            template_size: found.then_some(raw.template_size),
            method: raw.method,
            threshold,
            raw_score: raw.raw_score,
        }
    }

    /// One-decimal label drawn next to the box, e.g. `"85.0%"`.
    pub fn label(score: f32) -> String {
        format!("{:.1}%", score * 100.0)
    }
}
