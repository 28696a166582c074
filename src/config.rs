//! Match parameters and camera configuration

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::template_matching::MatchMethod;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Found-vs-not-found cutoff, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct Threshold(f32);

impl Threshold {
    pub const MIN: f32 = 0.1;
    pub const MAX: f32 = 1.0;
    /// Slider granularity
    pub const STEP: f32 = 0.05;

    pub fn new(value: f32) -> AnalyzerResult<Self> {
        if value.is_finite() && (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(AnalyzerError::InvalidThreshold { value })
        }
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// Whole-percent display, e.g. `70`.
    pub fn percent_label(self) -> String {
        format!("{:.0}", self.0 * 100.0)
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self(0.7)
    }
}

/// Parameters applied on the next analysis only.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct MatchParams {
    pub threshold: Threshold,
    pub method: MatchMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraImpl {
    Ffmpeg,
    Replay,
}

impl CameraImpl {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ffmpeg" => Some(CameraImpl::Ffmpeg),
            "replay" => Some(CameraImpl::Replay),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CameraImpl::Ffmpeg => "ffmpeg",
            CameraImpl::Replay => "replay",
        }
    }
}

/// Camera backend selection and capture tool settings.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraConfig {
    pub backend: CameraImpl,
    pub ffmpeg_path: String,
    pub input_format: String,
    pub front_device: String,
    pub rear_device: String,
    /// Where the live stream drops its latest frame
    pub frame_dir: PathBuf,
    pub replay_dir: PathBuf,
    pub frame_interval: Duration,
    pub frame_timeout: Duration,
}

impl Default for CameraConfig {
    fn default() -> Self {
        let (input_format, front_device, rear_device) = platform_defaults();
        Self {
            backend: CameraImpl::Ffmpeg,
            ffmpeg_path: "ffmpeg".to_string(),
            input_format: input_format.to_string(),
            front_device: front_device.to_string(),
            rear_device: rear_device.to_string(),
            frame_dir: std::env::temp_dir().join("fight-stats-analyzer"),
            replay_dir: PathBuf::from("frames"),
            frame_interval: Duration::from_millis(200),
            frame_timeout: Duration::from_secs(5),
        }
    }
}

impl CameraConfig {
    /// Defaults overridden by `CAMERA_*` / `FFMPEG_PATH` environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = lookup("CAMERA_IMPL") {
            match CameraImpl::parse(&raw) {
                Some(backend) => config.backend = backend,
                None => log::warn!("⚠️ Ignoring unknown CAMERA_IMPL '{}'", raw),
            }
        }
        if let Some(path) = lookup("FFMPEG_PATH") {
            config.ffmpeg_path = path;
        }
        if let Some(format) = lookup("CAMERA_INPUT_FORMAT") {
            config.input_format = format;
        }
        if let Some(device) = lookup("CAMERA_FRONT_DEVICE") {
            config.front_device = device;
        }
        if let Some(device) = lookup("CAMERA_REAR_DEVICE") {
            config.rear_device = device;
        }
        if let Some(dir) = lookup("CAMERA_REPLAY_DIR") {
            config.replay_dir = PathBuf::from(dir);
        }
        config
    }
}

fn platform_defaults() -> (&'static str, &'static str, &'static str) {
    if cfg!(target_os = "macos") {
        ("avfoundation", "0", "1")
    } else if cfg!(target_os = "windows") {
        ("dshow", "video=Integrated Camera", "video=Rear Camera")
    } else {
        ("v4l2", "/dev/video0", "/dev/video1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_threshold_bounds() {
        assert!(Threshold::new(0.1).is_ok());
        assert!(Threshold::new(1.0).is_ok());
        assert!(Threshold::new(0.05).is_err());
        assert!(Threshold::new(1.01).is_err());
        assert!(Threshold::new(f32::NAN).is_err());
    }

    #[test]
    fn test_match_params_defaults() {
        let params = MatchParams::default();
        assert_eq!(params.threshold.value(), 0.7);
        assert_eq!(params.method, MatchMethod::CoefficientNormalized);
        assert_eq!(params.threshold.percent_label(), "70");
    }

    #[test]
    fn test_camera_config_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("CAMERA_IMPL", "replay"),
            ("CAMERA_FRONT_DEVICE", "/dev/video4"),
            ("CAMERA_REPLAY_DIR", "/tmp/frames"),
        ]
        .into_iter()
        .collect();
        let config = CameraConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.backend, CameraImpl::Replay);
        assert_eq!(config.front_device, "/dev/video4");
        assert_eq!(config.replay_dir, PathBuf::from("/tmp/frames"));
        assert_eq!(config.ffmpeg_path, "ffmpeg");
    }

    #[test]
    fn test_unknown_camera_impl_keeps_default() {
        let config = CameraConfig::from_lookup(|key| {
            (key == "CAMERA_IMPL").then(|| "webgl".to_string())
        });
        assert_eq!(config.backend, CameraImpl::Ffmpeg);
    }
}
