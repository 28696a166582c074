// Camera capabilities implemented by each capture backend
use super::types::{FacingMode, SourceImage};
use crate::error::AnalyzerResult;

/// Encoded frame for the live preview (not decoded).
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewFrame {
    pub bytes: Vec<u8>,
    pub mime: &'static str,
}

/// A device that can open a video stream for a facing mode.
#[allow(async_fn_in_trait)]
pub trait CameraDevice: Send + Sync {
    type Stream: CameraStream;

    /// Request a stream. Failures (no permission, no device, tool missing)
    /// leave no stream behind.
    async fn open(&self, facing: FacingMode) -> AnalyzerResult<Self::Stream>;

    fn name(&self) -> &str;
}

/// An open stream. Must be stopped (or dropped) before another is opened.
#[allow(async_fn_in_trait)]
pub trait CameraStream: Send {
    /// Still raster of the current frame at native resolution.
    async fn capture_frame(&mut self) -> AnalyzerResult<SourceImage>;

    /// Latest frame for display; `None` until the first frame arrives.
    async fn preview_frame(&mut self) -> AnalyzerResult<Option<PreviewFrame>>;

    /// Release the capture device. Idempotent.
    fn stop(&mut self);

    /// Stop and wait until the device is actually released, so it can be
    /// reopened right away.
    async fn shutdown(&mut self) {
        self.stop();
    }
}
