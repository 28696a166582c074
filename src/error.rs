use std::path::PathBuf;
use thiserror::Error;

use crate::session::SessionPhase;

/// A specialized `Result` type for analyzer operations.
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// The error type for camera, decoding, matching and session operations.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error(
        "'{tool}' binary not found in PATH. Install it or set FFMPEG_PATH, or restart with --camera=replay."
    )]
    CameraToolMissing { tool: String },

    #[error("Unable to access camera '{device}': {reason}")]
    CameraAccess { device: String, reason: String },

    #[error("Camera produced no frame within {duration:?}")]
    CameraFrameUnavailable { duration: std::time::Duration },

    #[error("Selected file is not an image (type '{mime}')")]
    UnsupportedMediaType { mime: String },

    #[error("Failed to decode image: {source}")]
    Decode {
        #[from]
        source: image::ImageError,
    },

    #[error("Image has zero size ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error(
        "Template ({template_width}x{template_height}) is larger than the image ({image_width}x{image_height})"
    )]
    TemplateTooLarge {
        template_width: u32,
        template_height: u32,
        image_width: u32,
        image_height: u32,
    },

    #[error("Match score is not a finite number ({value})")]
    NonFiniteScore { value: f32 },

    #[error("Threshold {value} is outside the range 0.10..=1.00")]
    InvalidThreshold { value: f32 },

    #[error("Unknown matching method '{name}'")]
    UnknownMethod { name: String },

    #[error("Matching engine is not ready yet")]
    EngineUnavailable,

    #[error("No image captured or uploaded")]
    MissingSource,

    #[error("No template loaded")]
    MissingTemplate,

    #[error("Analysis already in progress")]
    Busy,

    #[error("Cannot {action} while {phase:?}")]
    InvalidTransition {
        action: &'static str,
        phase: SessionPhase,
    },

    #[error("Background task failed to complete: {source}")]
    Join {
        #[from]
        source: tokio::task::JoinError,
    },

    #[error("Failed to encode image: {description}")]
    Encode { description: String },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl AnalyzerError {
    /// Preconditions that keep an action disabled rather than producing a visible error.
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            AnalyzerError::EngineUnavailable
                | AnalyzerError::MissingSource
                | AnalyzerError::MissingTemplate
                | AnalyzerError::Busy
        )
    }

    pub fn is_camera_error(&self) -> bool {
        matches!(
            self,
            AnalyzerError::CameraToolMissing { .. }
                | AnalyzerError::CameraAccess { .. }
                | AnalyzerError::CameraFrameUnavailable { .. }
        )
    }

    /// Text shown to the user in the status line or results panel.
    pub fn user_message(&self) -> String {
        if self.is_camera_error() {
            format!(
                "Unable to access camera. Please ensure you have granted camera permissions. ({self})"
            )
        } else {
            self.to_string()
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalyzerError::Io {
            path: path.into(),
            source,
        }
    }
}
