use super::camera::{CameraDevice, CameraStream, PreviewFrame};
use super::ffmpeg::{FfmpegCamera, FfmpegStream};
use super::replay::{ReplayCamera, ReplayStream};
use super::types::{FacingMode, SourceImage};
use crate::config::{CameraConfig, CameraImpl};
use crate::error::AnalyzerResult;

/// Camera selected at startup (`--camera=` / `CAMERA_IMPL`).
pub enum CameraBackend {
    Ffmpeg(FfmpegCamera),
    Replay(ReplayCamera),
}

impl CameraBackend {
    pub fn from_config(config: &CameraConfig) -> Self {
        match config.backend {
            CameraImpl::Ffmpeg => CameraBackend::Ffmpeg(FfmpegCamera::new(config.clone())),
            CameraImpl::Replay => CameraBackend::Replay(ReplayCamera::new(
                config.replay_dir.clone(),
                config.frame_interval,
            )),
        }
    }
}

pub enum BackendStream {
    Ffmpeg(FfmpegStream),
    Replay(ReplayStream),
}

impl CameraDevice for CameraBackend {
    type Stream = BackendStream;

    async fn open(&self, facing: FacingMode) -> AnalyzerResult<BackendStream> {
        match self {
            CameraBackend::Ffmpeg(c) => c.open(facing).await.map(BackendStream::Ffmpeg),
            CameraBackend::Replay(c) => c.open(facing).await.map(BackendStream::Replay),
        }
    }

    fn name(&self) -> &str {
        match self {
            CameraBackend::Ffmpeg(c) => c.name(),
            CameraBackend::Replay(c) => c.name(),
        }
    }
}

impl CameraStream for BackendStream {
    async fn capture_frame(&mut self) -> AnalyzerResult<SourceImage> {
        match self {
            BackendStream::Ffmpeg(s) => s.capture_frame().await,
            BackendStream::Replay(s) => s.capture_frame().await,
        }
    }

    async fn preview_frame(&mut self) -> AnalyzerResult<Option<PreviewFrame>> {
        match self {
            BackendStream::Ffmpeg(s) => s.preview_frame().await,
            BackendStream::Replay(s) => s.preview_frame().await,
        }
    }

    fn stop(&mut self) {
        match self {
            BackendStream::Ffmpeg(s) => s.stop(),
            BackendStream::Replay(s) => s.stop(),
        }
    }

    async fn shutdown(&mut self) {
        match self {
            BackendStream::Ffmpeg(s) => s.shutdown().await,
            BackendStream::Replay(s) => s.shutdown().await,
        }
    }
}
