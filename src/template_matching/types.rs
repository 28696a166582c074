/// Template matching data types
use crate::error::AnalyzerError;
use crate::media::ImageSize;
use image::GrayImage;
use serde::Serialize;
use std::str::FromStr;

/// Scoring function used to compare the template at each offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum MatchMethod {
    SquaredDifference,
    SquaredDifferenceNormalized,
    CrossCorrelation,
    CrossCorrelationNormalized,
    Coefficient,
    #[default]
    CoefficientNormalized,
}

impl MatchMethod {
    pub const ALL: [MatchMethod; 6] = [
        MatchMethod::SquaredDifference,
        MatchMethod::SquaredDifferenceNormalized,
        MatchMethod::CrossCorrelation,
        MatchMethod::CrossCorrelationNormalized,
        MatchMethod::Coefficient,
        MatchMethod::CoefficientNormalized,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MatchMethod::SquaredDifference => "TM_SQDIFF",
            MatchMethod::SquaredDifferenceNormalized => "TM_SQDIFF_NORMED",
            MatchMethod::CrossCorrelation => "TM_CCORR",
            MatchMethod::CrossCorrelationNormalized => "TM_CCORR_NORMED",
            MatchMethod::Coefficient => "TM_CCOEFF",
            MatchMethod::CoefficientNormalized => "TM_CCOEFF_NORMED",
        }
    }

    /// Short name accepted on the command line.
    pub fn slug(self) -> &'static str {
        match self {
            MatchMethod::SquaredDifference => "sqdiff",
            MatchMethod::SquaredDifferenceNormalized => "sqdiff-normed",
            MatchMethod::CrossCorrelation => "ccorr",
            MatchMethod::CrossCorrelationNormalized => "ccorr-normed",
            MatchMethod::Coefficient => "ccoeff",
            MatchMethod::CoefficientNormalized => "ccoeff-normed",
        }
    }

    /// Squared-difference scores are best at their minimum.
    pub fn lower_is_better(self) -> bool {
        matches!(
            self,
            MatchMethod::SquaredDifference | MatchMethod::SquaredDifferenceNormalized
        )
    }

    /// Range of [`MatchMethod::normalize_score`] for this method.
    pub fn score_range(self) -> (f32, f32) {
        match self {
            MatchMethod::Coefficient | MatchMethod::CoefficientNormalized => (-1.0, 1.0),
            _ => (0.0, 1.0),
        }
    }

    /// Map a raw extremum onto a higher-is-better scale comparable with the
    /// threshold. Correlation methods are divided by the raw score the
    /// template gets against itself, so an exact occurrence scores 1.
    /// Unnormalized squared difference is divided by its largest possible
    /// value for the template area.
    pub fn normalize_score(self, raw: f32, template: &TemplateEnergy) -> f32 {
        let raw = raw as f64;
        let score = match self {
            MatchMethod::SquaredDifference => 1.0 - raw / template.peak(),
            MatchMethod::SquaredDifferenceNormalized => 1.0 - raw,
            MatchMethod::CrossCorrelation => raw / template.self_correlation(),
            MatchMethod::CrossCorrelationNormalized | MatchMethod::CoefficientNormalized => raw,
            MatchMethod::Coefficient => raw / template.self_coefficient(),
        };
        let (lo, hi) = self.score_range();
        (score as f32).clamp(lo, hi)
    }
}

/// Below this a template counts as black (correlation) or flat (coefficient).
const MIN_ENERGY: f64 = 1e-6;

/// Luminance statistics of a template: the raw scores of a perfect match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemplateEnergy {
    pub area: u64,
    /// `Σ T²`
    pub sum_sq: f64,
    /// `Σ (T - t̄)²`
    pub centered_sum_sq: f64,
}

impl TemplateEnergy {
    pub fn of(template: &GrayImage) -> Self {
        let values = template.as_raw();
        let area = values.len() as u64;
        let sum: f64 = values.iter().map(|&v| v as f64).sum();
        let sum_sq: f64 = values.iter().map(|&v| (v as f64) * (v as f64)).sum();
        let centered_sum_sq = if area == 0 {
            0.0
        } else {
            (sum_sq - sum * sum / area as f64).max(0.0)
        };
        Self {
            area,
            sum_sq,
            centered_sum_sq,
        }
    }

    /// Largest squared difference or correlation any window can produce.
    fn peak(&self) -> f64 {
        255.0 * 255.0 * self.area.max(1) as f64
    }

    fn self_correlation(&self) -> f64 {
        if self.sum_sq > MIN_ENERGY {
            self.sum_sq
        } else {
            self.peak()
        }
    }

    fn self_coefficient(&self) -> f64 {
        if self.centered_sum_sq > MIN_ENERGY {
            self.centered_sum_sq
        } else {
            self.peak() / 4.0
        }
    }
}

impl FromStr for MatchMethod {
    type Err = AnalyzerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        MatchMethod::ALL
            .into_iter()
            .find(|m| {
                m.slug() == wanted || m.label().to_ascii_lowercase().replace('_', "-") == wanted
            })
            .ok_or_else(|| AnalyzerError::UnknownMethod {
                name: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchLocation {
    pub x: u32,
    pub y: u32,
}

/// Single best alignment reported by the matcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RawMatch {
    /// Top-left corner of the best alignment in the source image
    pub location: MatchLocation,
    /// Extremum exactly as produced by the scoring function
    pub raw_score: f32,
    /// Higher-is-better score, see [`MatchMethod::normalize_score`]
    pub score: f32,
    pub method: MatchMethod,
    pub source_size: ImageSize,
    pub template_size: ImageSize,
}
