/// Single-best template matching
///
/// Scores every offset where the template fits entirely inside the source,
/// then picks the extremum the method calls best (minimum for squared
/// difference, maximum otherwise).
use super::coefficient::coefficient_map;
use super::types::{MatchLocation, MatchMethod, RawMatch, TemplateEnergy};
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::media::{SourceImage, TemplateImage};
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::template_matching::{MatchTemplateMethod, find_extremes, match_template_parallel};
use std::time::Instant;

pub type ScoreMap = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Locate `template` inside `source`. Pure: same inputs give the same result.
pub fn match_template(
    source: &SourceImage,
    template: &TemplateImage,
    method: MatchMethod,
) -> AnalyzerResult<RawMatch> {
    validate_sizes(source, template)?;

    let start = Instant::now();
    let source_gray = source.luma();
    let template_gray = template.luma();
    let mut scores = score_map(&source_gray, &template_gray, method);
    sanitize(&mut scores, method);

    let extremes = find_extremes(&scores);
    let (raw_score, (x, y)) = if method.lower_is_better() {
        (extremes.min_value, extremes.min_value_location)
    } else {
        (extremes.max_value, extremes.max_value_location)
    };
    if !raw_score.is_finite() {
        return Err(AnalyzerError::NonFiniteScore { value: raw_score });
    }

    let score = method.normalize_score(raw_score, &TemplateEnergy::of(&template_gray));
    log::debug!(
        "🔍 {} {}x{} in {}x{}: best at ({}, {}) raw={:.4} score={:.4} in {}ms",
        method.label(),
        template.width(),
        template.height(),
        source.width(),
        source.height(),
        x,
        y,
        raw_score,
        score,
        start.elapsed().as_millis()
    );

    Ok(RawMatch {
        location: MatchLocation { x, y },
        raw_score,
        score,
        method,
        source_size: source.size(),
        template_size: template.size(),
    })
}

fn validate_sizes(source: &SourceImage, template: &TemplateImage) -> AnalyzerResult<()> {
    for (width, height) in [
        (source.width(), source.height()),
        (template.width(), template.height()),
    ] {
        if width == 0 || height == 0 {
            return Err(AnalyzerError::EmptyImage { width, height });
        }
    }
    if template.width() > source.width() || template.height() > source.height() {
        return Err(AnalyzerError::TemplateTooLarge {
            template_width: template.width(),
            template_height: template.height(),
            image_width: source.width(),
            image_height: source.height(),
        });
    }
    Ok(())
}

/// Raw score at every valid offset. The template must fit inside the image.
pub fn score_map(image: &GrayImage, template: &GrayImage, method: MatchMethod) -> ScoreMap {
    let builtin = |m| match_template_parallel(image, template, m);
    match method {
        MatchMethod::SquaredDifference => builtin(MatchTemplateMethod::SumOfSquaredErrors),
        MatchMethod::SquaredDifferenceNormalized => {
            builtin(MatchTemplateMethod::SumOfSquaredErrorsNormalized)
        }
        MatchMethod::CrossCorrelation => builtin(MatchTemplateMethod::CrossCorrelation),
        MatchMethod::CrossCorrelationNormalized => {
            builtin(MatchTemplateMethod::CrossCorrelationNormalized)
        }
        MatchMethod::Coefficient => coefficient_map(image, template, false),
        MatchMethod::CoefficientNormalized => coefficient_map(image, template, true),
    }
}

/// Normalized methods divide by zero on flat black windows. Those offsets
/// become the worst possible score so they never win.
fn sanitize(scores: &mut ScoreMap, method: MatchMethod) {
    let worst = if method.lower_is_better() {
        f32::INFINITY
    } else {
        f32::NEG_INFINITY
    };
    for value in scores.iter_mut().filter(|v| v.is_nan()) {
        *value = worst;
    }
}
