// Camera backend that plays back still images from a directory.
// `front/` and `rear/` subdirectories are used per facing mode when present.
use super::camera::{CameraDevice, CameraStream, PreviewFrame};
use super::types::{FacingMode, SourceImage};
use crate::error::{AnalyzerError, AnalyzerResult};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const FRAME_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

pub struct ReplayCamera {
    dir: PathBuf,
    frame_interval: Duration,
}

impl ReplayCamera {
    pub fn new(dir: impl Into<PathBuf>, frame_interval: Duration) -> Self {
        Self {
            dir: dir.into(),
            frame_interval,
        }
    }

    fn dir_for(&self, facing: FacingMode) -> PathBuf {
        let nested = self.dir.join(facing.label());
        if nested.is_dir() { nested } else { self.dir.clone() }
    }

    async fn list_frames(dir: &Path) -> AnalyzerResult<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(dir)
            .await
            .map_err(|e| AnalyzerError::io(dir, e))?;
        let mut frames = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| AnalyzerError::io(dir, e))?
        {
            let path = entry.path();
            if path.is_file() && mime_for(&path).is_some() {
                frames.push(path);
            }
        }
        frames.sort();
        Ok(frames)
    }
}

impl CameraDevice for ReplayCamera {
    type Stream = ReplayStream;

    async fn open(&self, facing: FacingMode) -> AnalyzerResult<ReplayStream> {
        let dir = self.dir_for(facing);
        let frames = Self::list_frames(&dir)
            .await
            .map_err(|e| AnalyzerError::CameraAccess {
                device: dir.display().to_string(),
                reason: e.to_string(),
            })?;
        if frames.is_empty() {
            return Err(AnalyzerError::CameraAccess {
                device: dir.display().to_string(),
                reason: "no image frames found".to_string(),
            });
        }
        log::info!(
            "📷 Replay stream started: {} frames from {}",
            frames.len(),
            dir.display()
        );
        Ok(ReplayStream {
            frames,
            facing,
            started: Instant::now(),
            frame_interval: self.frame_interval,
            stopped: false,
        })
    }

    fn name(&self) -> &str {
        "replay"
    }
}

pub struct ReplayStream {
    frames: Vec<PathBuf>,
    facing: FacingMode,
    started: Instant,
    frame_interval: Duration,
    stopped: bool,
}

impl ReplayStream {
    fn current_frame(&self) -> AnalyzerResult<&Path> {
        if self.stopped {
            return Err(AnalyzerError::CameraAccess {
                device: "replay".to_string(),
                reason: "stream already stopped".to_string(),
            });
        }
        let ticks = self.started.elapsed().as_millis() / self.frame_interval.as_millis().max(1);
        let index = (ticks % self.frames.len() as u128) as usize;
        Ok(&self.frames[index])
    }
}

impl CameraStream for ReplayStream {
    async fn capture_frame(&mut self) -> AnalyzerResult<SourceImage> {
        let path = self.current_frame()?.to_path_buf();
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| AnalyzerError::io(&path, e))?;
        SourceImage::from_upload(&bytes, mime_for(&path))
    }

    async fn preview_frame(&mut self) -> AnalyzerResult<Option<PreviewFrame>> {
        let path = self.current_frame()?.to_path_buf();
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| AnalyzerError::io(&path, e))?;
        Ok(Some(PreviewFrame {
            bytes,
            mime: mime_for(&path).unwrap_or("image/png"),
        }))
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            log::info!("⏹️ Replay stream stopped ({})", self.facing.label());
        }
    }
}

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if !FRAME_EXTENSIONS.contains(&ext.as_str()) {
        return None;
    }
    Some(match ext.as_str() {
        "png" => "image/png",
        "bmp" => "image/bmp",
        _ => "image/jpeg",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::types::Raster;
    use image::{Rgba, RgbaImage};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("fsa-replay-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_frame(path: &Path, shade: u8) {
        let raster = Raster::new(RgbaImage::from_pixel(6, 4, Rgba([shade, shade, shade, 255])));
        std::fs::write(path, raster.encode_png().unwrap().as_slice()).unwrap();
    }

    #[test]
    fn test_mime_for_extensions() {
        assert_eq!(mime_for(Path::new("a.PNG")), Some("image/png"));
        assert_eq!(mime_for(Path::new("a.jpeg")), Some("image/jpeg"));
        assert_eq!(mime_for(Path::new("notes.txt")), None);
        assert_eq!(mime_for(Path::new("no_extension")), None);
    }

    #[tokio::test]
    async fn test_replay_prefers_facing_subdirectory() {
        let dir = scratch_dir("facing");
        write_frame(&dir.join("root.png"), 10);
        std::fs::create_dir_all(dir.join("rear")).unwrap();
        write_frame(&dir.join("rear").join("rear.png"), 200);

        let camera = ReplayCamera::new(&dir, Duration::from_secs(60));
        let mut rear = camera.open(FacingMode::Rear).await.unwrap();
        let frame = rear.capture_frame().await.unwrap();
        assert_eq!(frame.pixels().get_pixel(0, 0), &Rgba([200, 200, 200, 255]));

        let mut front = camera.open(FacingMode::Front).await.unwrap();
        let frame = front.capture_frame().await.unwrap();
        assert_eq!(frame.pixels().get_pixel(0, 0), &Rgba([10, 10, 10, 255]));
    }

    #[tokio::test]
    async fn test_empty_directory_is_camera_error() {
        let dir = scratch_dir("empty");
        let camera = ReplayCamera::new(&dir, Duration::from_millis(100));
        let err = camera.open(FacingMode::Front).await.err().unwrap();
        assert!(err.is_camera_error());
    }

    #[tokio::test]
    async fn test_stopped_stream_refuses_capture() {
        let dir = scratch_dir("stopped");
        write_frame(&dir.join("a.png"), 1);
        let camera = ReplayCamera::new(&dir, Duration::from_millis(100));
        let mut stream = camera.open(FacingMode::Front).await.unwrap();
        stream.stop();
        stream.stop();
        assert!(stream.stopped);
        assert!(stream.capture_frame().await.is_err());
        assert!(stream.preview_frame().await.is_err());
    }
}
