use serde::Serialize;

/// Where the capture/analyze workflow currently is.
///
/// ```text
/// Idle -> CameraActive -> Captured -> Processing -> Resulted
///   ^          |  ^           ^                        |
///   |          |  +--retake---+------------------------+
///   +--reset---+ (from any phase)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SessionPhase {
    #[default]
    Idle,
    CameraActive,
    Captured,
    Processing,
    Resulted,
}

impl SessionPhase {
    pub fn label(self) -> &'static str {
        match self {
            SessionPhase::Idle => "Idle",
            SessionPhase::CameraActive => "Camera active",
            SessionPhase::Captured => "Image ready",
            SessionPhase::Processing => "Processing",
            SessionPhase::Resulted => "Results ready",
        }
    }

    /// Phases in which a source image is held.
    pub fn has_source(self) -> bool {
        matches!(
            self,
            SessionPhase::Captured | SessionPhase::Processing | SessionPhase::Resulted
        )
    }
}
