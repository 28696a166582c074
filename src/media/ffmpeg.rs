// Live camera stream driven by an external ffmpeg process.
// The child keeps overwriting a single JPEG with the newest frame; capture
// and preview read that file.
use super::camera::{CameraDevice, CameraStream, PreviewFrame};
use super::types::{FacingMode, SourceImage};
use crate::config::CameraConfig;
use crate::error::{AnalyzerError, AnalyzerResult};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::time::{Instant, sleep};

/// Time given to the capture process to fail fast (busy device, no permission).
const STARTUP_SETTLE: Duration = Duration::from_millis(400);
const FRAME_POLL: Duration = Duration::from_millis(50);
/// Upper bound on waiting for a killed capture process to exit.
const STOP_TIMEOUT: Duration = Duration::from_secs(2);

pub struct FfmpegCamera {
    config: CameraConfig,
}

impl FfmpegCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self { config }
    }

    async fn ensure_tool_available(&self) -> AnalyzerResult<()> {
        let tool = &self.config.ffmpeg_path;
        match Command::new(tool)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
        {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => Err(AnalyzerError::CameraAccess {
                device: tool.clone(),
                reason: format!("'{tool} -version' returned non-zero ({status})"),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AnalyzerError::CameraToolMissing { tool: tool.clone() })
            }
            Err(e) => Err(AnalyzerError::CameraAccess {
                device: tool.clone(),
                reason: format!("failed to invoke '{tool}': {e}"),
            }),
        }
    }

    pub fn device_for(&self, facing: FacingMode) -> &str {
        match facing {
            FacingMode::Front => &self.config.front_device,
            FacingMode::Rear => &self.config.rear_device,
        }
    }

    pub fn frame_path(&self, facing: FacingMode) -> PathBuf {
        self.config
            .frame_dir
            .join(format!("{}-latest.jpg", facing.label()))
    }

    /// Arguments for a capture process that keeps `frame_path` updated.
    pub fn capture_args(&self, facing: FacingMode, frame_path: &Path) -> Vec<String> {
        let fps = (1000 / self.config.frame_interval.as_millis().max(1)).max(1);
        vec![
            "-hide_banner".into(),
            "-loglevel".into(),
            "error".into(),
            "-nostdin".into(),
            "-f".into(),
            self.config.input_format.clone(),
            "-i".into(),
            self.device_for(facing).to_string(),
            "-r".into(),
            fps.to_string(),
            "-q:v".into(),
            "3".into(),
            "-update".into(),
            "1".into(),
            "-y".into(),
            frame_path.to_string_lossy().into_owned(),
        ]
    }
}

impl CameraDevice for FfmpegCamera {
    type Stream = FfmpegStream;

    async fn open(&self, facing: FacingMode) -> AnalyzerResult<FfmpegStream> {
        self.ensure_tool_available().await?;
        tokio::fs::create_dir_all(&self.config.frame_dir)
            .await
            .map_err(|e| AnalyzerError::io(&self.config.frame_dir, e))?;

        let frame_path = self.frame_path(facing);
        // A frame left over from an earlier stream must not be captured.
        let _ = tokio::fs::remove_file(&frame_path).await;

        let device = self.device_for(facing).to_string();
        log::debug!(
            "📷 Opening {} camera '{}' (facingMode={})",
            facing.label(),
            device,
            facing.constraint()
        );
        let mut child = Command::new(&self.config.ffmpeg_path)
            .args(self.capture_args(facing, &frame_path))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AnalyzerError::CameraAccess {
                device: device.clone(),
                reason: format!("failed to start capture process: {e}"),
            })?;

        sleep(STARTUP_SETTLE).await;
        if let Some(status) = child
            .try_wait()
            .map_err(|e| AnalyzerError::io(&self.config.ffmpeg_path, e))?
        {
            let mut stderr = String::new();
            if let Some(mut pipe) = child.stderr.take() {
                let _ = pipe.read_to_string(&mut stderr).await;
            }
            let reason = stderr
                .lines()
                .rev()
                .find(|line| !line.trim().is_empty())
                .map(|line| line.trim().to_string())
                .unwrap_or_else(|| format!("capture process exited ({status})"));
            log::error!("❌ Camera '{}' failed to start: {}", device, reason);
            return Err(AnalyzerError::CameraAccess { device, reason });
        }

        log::info!("📷 Camera stream started: {} ({})", device, facing.label());
        Ok(FfmpegStream {
            child: Some(child),
            facing,
            device,
            frame_path,
            frame_timeout: self.config.frame_timeout,
        })
    }

    fn name(&self) -> &str {
        "ffmpeg"
    }
}

pub struct FfmpegStream {
    child: Option<Child>,
    facing: FacingMode,
    device: String,
    frame_path: PathBuf,
    frame_timeout: Duration,
}

impl FfmpegStream {
    fn check_alive(&mut self) -> AnalyzerResult<()> {
        let Some(child) = self.child.as_mut() else {
            return Err(AnalyzerError::CameraAccess {
                device: self.device.clone(),
                reason: "stream already stopped".to_string(),
            });
        };
        match child.try_wait() {
            Ok(None) => Ok(()),
            Ok(Some(status)) => Err(AnalyzerError::CameraAccess {
                device: self.device.clone(),
                reason: format!("capture process exited ({status})"),
            }),
            Err(e) => Err(AnalyzerError::io(&self.frame_path, e)),
        }
    }

    fn kill(&self, child: &mut Child) {
        if let Err(e) = child.start_kill() {
            log::warn!("⚠️ Failed to stop capture process for '{}': {}", self.device, e);
        }
        log::info!("⏹️ Camera stream stopped: {} ({})", self.device, self.facing.label());
    }

    async fn read_latest(&self) -> AnalyzerResult<Option<Vec<u8>>> {
        match tokio::fs::read(&self.frame_path).await {
            Ok(bytes) if !bytes.is_empty() => Ok(Some(bytes)),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AnalyzerError::io(&self.frame_path, e)),
        }
    }
}

impl CameraStream for FfmpegStream {
    async fn capture_frame(&mut self) -> AnalyzerResult<SourceImage> {
        let deadline = Instant::now() + self.frame_timeout;
        loop {
            self.check_alive()?;
            if let Some(bytes) = self.read_latest().await? {
                // The file can be caught mid-write; retry until it decodes.
                match SourceImage::from_upload(&bytes, Some("image/jpeg")) {
                    Ok(frame) => {
                        log::debug!("📸 Captured frame {}x{}", frame.width(), frame.height());
                        return Ok(frame);
                    }
                    Err(e) => log::debug!("⏳ Frame not decodable yet: {}", e),
                }
            }
            if Instant::now() >= deadline {
                return Err(AnalyzerError::CameraFrameUnavailable {
                    duration: self.frame_timeout,
                });
            }
            sleep(FRAME_POLL).await;
        }
    }

    async fn preview_frame(&mut self) -> AnalyzerResult<Option<PreviewFrame>> {
        self.check_alive()?;
        Ok(self.read_latest().await?.map(|bytes| PreviewFrame {
            bytes,
            mime: "image/jpeg",
        }))
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            self.kill(&mut child);
        }
    }

    async fn shutdown(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        self.kill(&mut child);
        match tokio::time::timeout(STOP_TIMEOUT, child.wait()).await {
            Ok(Ok(status)) => log::debug!("⏹️ Capture process for '{}' exited ({})", self.device, status),
            Ok(Err(e)) => log::warn!("⚠️ Failed to reap capture process for '{}': {}", self.device, e),
            Err(_) => log::warn!(
                "⚠️ Capture process for '{}' still running after {}ms",
                self.device,
                STOP_TIMEOUT.as_millis()
            ),
        }
    }
}

impl Drop for FfmpegStream {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> FfmpegCamera {
        FfmpegCamera::new(CameraConfig {
            input_format: "v4l2".to_string(),
            front_device: "/dev/video0".to_string(),
            rear_device: "/dev/video2".to_string(),
            frame_dir: PathBuf::from("/tmp/fsa"),
            ..CameraConfig::default()
        })
    }

    #[test]
    fn test_device_follows_facing_mode() {
        let cam = camera();
        assert_eq!(cam.device_for(FacingMode::Front), "/dev/video0");
        assert_eq!(cam.device_for(FacingMode::Rear), "/dev/video2");
        assert_eq!(
            cam.frame_path(FacingMode::Rear),
            PathBuf::from("/tmp/fsa/rear-latest.jpg")
        );
    }

    #[test]
    fn test_capture_args_keep_single_frame_file() {
        let cam = camera();
        let path = cam.frame_path(FacingMode::Front);
        let args = cam.capture_args(FacingMode::Front, &path);

        let input = args.iter().position(|a| a == "-i").unwrap();
        assert_eq!(args[input + 1], "/dev/video0");
        let format = args.iter().position(|a| a == "-f").unwrap();
        assert_eq!(args[format + 1], "v4l2");
        let update = args.iter().position(|a| a == "-update").unwrap();
        assert_eq!(args[update + 1], "1");
        // 200ms default interval
        let rate = args.iter().position(|a| a == "-r").unwrap();
        assert_eq!(args[rate + 1], "5");
        assert_eq!(args.last().unwrap(), "/tmp/fsa/front-latest.jpg");
    }

    #[tokio::test]
    async fn test_missing_tool_reported() {
        let cam = FfmpegCamera::new(CameraConfig {
            ffmpeg_path: "ffmpeg-binary-that-does-not-exist".to_string(),
            ..CameraConfig::default()
        });
        let err = cam.open(FacingMode::Front).await.err().unwrap();
        assert!(matches!(err, AnalyzerError::CameraToolMissing { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shutdown_waits_for_process_exit() {
        let child = Command::new("sleep").arg("30").spawn().unwrap();
        let mut stream = FfmpegStream {
            child: Some(child),
            facing: FacingMode::Front,
            device: "/dev/video0".to_string(),
            frame_path: PathBuf::from("/tmp/fsa/front-latest.jpg"),
            frame_timeout: Duration::from_millis(100),
        };

        tokio::time::timeout(Duration::from_secs(5), stream.shutdown())
            .await
            .expect("shutdown should not hang on a killed process");
        assert!(stream.child.is_none());
        assert!(stream.preview_frame().await.is_err());

        // second shutdown is a no-op
        stream.shutdown().await;
    }
}
