// Headless analysis: the same session workflow the GUI drives, fed from files
use crate::args::AnalyzeArgs;
use crate::config::CameraConfig;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::media::CameraBackend;
use crate::session::{Analysis, Session};
use crate::template_matching::EngineReadiness;
use std::path::Path;

/// Load both images, analyze once, and write the annotated PNG if asked.
pub async fn run_analyze(args: &AnalyzeArgs, camera: &CameraConfig) -> AnalyzerResult<Analysis> {
    let engine = EngineReadiness::spawn();
    let mut session = Session::new(CameraBackend::from_config(camera), engine.clone());

    let image = read_file(&args.image).await?;
    let template = read_file(&args.template).await?;
    session.upload_source(&image, None)?;
    session.load_template(&template, None)?;
    session.set_threshold(args.params.threshold);
    session.set_method(args.params.method);

    engine.wait_ready().await?;
    let analysis = session.analyze().await?;

    if let Some(out) = &args.out {
        let png = analysis.annotated.encode_png()?;
        tokio::fs::write(out, png.as_slice())
            .await
            .map_err(|e| AnalyzerError::io(out, e))?;
        log::info!("💾 Annotated image saved to {}", out.display());
    }
    Ok(analysis)
}

/// Summary text for stdout: pretty JSON, or the human-readable lines.
pub fn format_summary(analysis: &Analysis, json: bool) -> AnalyzerResult<String> {
    let summary = &analysis.summary;
    if json {
        return serde_json::to_string_pretty(summary).map_err(|e| AnalyzerError::Encode {
            description: e.to_string(),
        });
    }

    let mut lines = vec![
        format!("{} {}", if summary.found { "✅" } else { "❌" }, summary.message),
        format!("   Method:     {}", summary.method.label()),
        format!("   Confidence: {}%", summary.confidence),
        format!("   Location:   ({}, {})", summary.location.x, summary.location.y),
        format!(
            "   Image size: {}x{}",
            summary.image_size.width, summary.image_size.height
        ),
    ];
    if let Some(size) = summary.template_size {
        lines.push(format!("   Template:   {}x{}", size.width, size.height));
    }
    Ok(lines.join("\n"))
}

async fn read_file(path: &Path) -> AnalyzerResult<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| AnalyzerError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatchParams;
    use crate::template_matching::MatchLocation;
    use image::{Rgba, RgbaImage};
    use std::path::PathBuf;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("fsa-cli-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_fixtures(dir: &Path) -> (PathBuf, PathBuf) {
        let scene = RgbaImage::from_fn(120, 90, |x, y| {
            let v = ((x * 17 + y * 43 + (x * y) % 13) % 233) as u8;
            Rgba([v, v / 3, 255 - v, 255])
        });
        let template = image::imageops::crop_imm(&scene, 70, 40, 20, 15).to_image();
        let image_path = dir.join("scene.png");
        let template_path = dir.join("template.png");
        scene.save(&image_path).unwrap();
        template.save(&template_path).unwrap();
        (image_path, template_path)
    }

    #[tokio::test]
    async fn test_analyze_files_and_write_output() {
        let dir = scratch_dir("ok");
        let (image, template) = write_fixtures(&dir);
        let out = dir.join("annotated.png");
        let args = AnalyzeArgs {
            image,
            template,
            params: MatchParams::default(),
            out: Some(out.clone()),
            json: false,
        };

        let analysis = run_analyze(&args, &CameraConfig::default()).await.unwrap();
        assert!(analysis.summary.found);
        assert_eq!(analysis.summary.location, MatchLocation { x: 70, y: 40 });

        let written = image::open(&out).unwrap();
        assert_eq!((written.width(), written.height()), (120, 90));

        let text = format_summary(&analysis, false).unwrap();
        assert!(text.contains("Template found with"));
        let json = format_summary(&analysis, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["found"], true);
        assert_eq!(value["templateSize"]["width"], 20);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = scratch_dir("missing");
        let args = AnalyzeArgs {
            image: dir.join("nope.png"),
            template: dir.join("nope.png"),
            params: MatchParams::default(),
            out: None,
            json: true,
        };
        assert!(matches!(
            run_analyze(&args, &CameraConfig::default()).await,
            Err(AnalyzerError::Io { .. })
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_template_larger_than_image_fails() {
        let dir = scratch_dir("large");
        let (image, template) = write_fixtures(&dir);
        let args = AnalyzeArgs {
            image: template,
            template: image,
            params: MatchParams::default(),
            out: None,
            json: false,
        };
        assert!(matches!(
            run_analyze(&args, &CameraConfig::default()).await,
            Err(AnalyzerError::TemplateTooLarge { .. })
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
