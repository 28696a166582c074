/// Template matching module for locating a template inside a source image
///
/// This module provides:
/// - Six scoring methods (squared difference, cross-correlation, correlation
///   coefficient, each plain and normalized)
/// - Single best-location search with method-aware extremum selection
/// - Scores mapped onto a common higher-is-better scale for thresholding
/// - An engine readiness signal backed by a startup self-test
pub mod coefficient;
pub mod engine;
pub mod matcher;
pub mod types;

pub use engine::EngineReadiness;
pub use matcher::match_template;
pub use types::{MatchLocation, MatchMethod, RawMatch};
