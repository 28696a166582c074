//! Result renderer: draws the best match onto a copy of the source and
//! builds the structured summary.

pub mod annotate;
pub mod glyphs;
pub mod summary;

use crate::config::Threshold;
use crate::media::{Raster, SourceImage};
use crate::template_matching::RawMatch;
use annotate::{FOUND_STYLE, NOT_FOUND_STYLE, draw_label, draw_match_box};
use std::ops::Deref;

pub use summary::{MatchSummary, is_found};

/// Source raster with the match box and label drawn on it.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedImage(Raster);

impl AnnotatedImage {
    pub fn raster(&self) -> &Raster {
        &self.0
    }
}

impl Deref for AnnotatedImage {
    type Target = Raster;

    fn deref(&self) -> &Raster {
        &self.0
    }
}

/// Annotate `source` with `raw` and summarize it against `threshold`.
/// The source itself is never modified.
pub fn render(
    source: &SourceImage,
    raw: &RawMatch,
    threshold: Threshold,
) -> (AnnotatedImage, MatchSummary) {
    let summary = MatchSummary::from_match(raw, threshold);
    let style = if summary.found {
        &FOUND_STYLE
    } else {
        &NOT_FOUND_STYLE
    };

    let mut canvas = source.pixels().clone();
    let (x, y) = (raw.location.x, raw.location.y);
    draw_match_box(
        &mut canvas,
        x,
        y,
        raw.template_size.width,
        raw.template_size.height,
        style,
    );
    draw_label(&mut canvas, &MatchSummary::label(raw.score), x, y, style);

    (AnnotatedImage(Raster::new(canvas)), summary)
}
