use crate::config::{CameraConfig, CameraImpl, MatchParams, Threshold};
use crate::template_matching::MatchMethod;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Gui,
    Analyze(AnalyzeArgs),
}

/// Inputs for a headless `--analyze` run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeArgs {
    pub image: PathBuf,
    pub template: PathBuf,
    pub params: MatchParams,
    pub out: Option<PathBuf>,
    pub json: bool,
}

#[derive(Debug)]
pub struct Args {
    pub mode: Mode,
    pub debug_mode: bool,
    pub camera: CameraConfig,
}

impl Args {
    /// Parse the process arguments. Prints help/version/errors itself and
    /// returns `None` when the program should exit.
    pub fn parse() -> Option<Self> {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(&args, CameraConfig::from_env()) {
            Ok(Some(args)) => Some(args),
            Ok(None) => None,
            Err(message) => {
                eprintln!("❌ {}", message);
                print_help();
                None
            }
        }
    }

    /// `Ok(None)` means help or version was printed.
    pub fn parse_from(args: &[String], mut camera: CameraConfig) -> Result<Option<Self>, String> {
        let mut analyze = false;
        let mut debug_mode = false;
        let mut image: Option<PathBuf> = None;
        let mut template: Option<PathBuf> = None;
        let mut params = MatchParams::default();
        let mut out: Option<PathBuf> = None;
        let mut json = false;

        for arg in args {
            if arg == "--help" || arg == "-h" {
                print_help();
                return Ok(None);
            } else if arg == "--version" || arg == "-v" {
                println!("{}", version_line());
                return Ok(None);
            } else if arg == "--debug" {
                debug_mode = true;
            } else if arg == "--gui" {
                analyze = false;
            } else if arg == "--analyze" || arg == "-a" {
                analyze = true;
            } else if arg == "--json" {
                json = true;
            } else if let Some(val) = arg.strip_prefix("--image=") {
                image = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--template=") {
                template = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--out=") {
                out = Some(PathBuf::from(val));
            } else if let Some(val) = arg.strip_prefix("--threshold=") {
                let value: f32 = val
                    .parse()
                    .map_err(|_| format!("Invalid threshold value: {}", val))?;
                params.threshold = Threshold::new(value).map_err(|e| e.to_string())?;
            } else if let Some(val) = arg.strip_prefix("--method=") {
                params.method = val.parse::<MatchMethod>().map_err(|e| e.to_string())?;
            } else if let Some(val) = arg.strip_prefix("--camera=") {
                camera.backend = CameraImpl::parse(val)
                    .ok_or_else(|| format!("Unknown camera '{}', expected 'ffmpeg' or 'replay'", val))?;
            } else if let Some(val) = arg.strip_prefix("--replay-dir=") {
                camera.replay_dir = PathBuf::from(val);
            } else {
                return Err(format!("Unknown argument: {}", arg));
            }
        }

        let mode = if analyze {
            let image = image.ok_or("--analyze requires --image=PATH")?;
            let template = template.ok_or("--analyze requires --template=PATH")?;
            Mode::Analyze(AnalyzeArgs {
                image,
                template,
                params,
                out,
                json,
            })
        } else {
            Mode::Gui
        };

        Ok(Some(Args {
            mode,
            debug_mode,
            camera,
        }))
    }
}

/// `--version` output, e.g. `Fight Stats Analyzer v0.1.0-dev (built 2026)`.
pub fn version_line() -> String {
    format!(
        "Fight Stats Analyzer v{} (built {})",
        env!("APP_VERSION_DISPLAY"),
        env!("APP_BUILD_YEAR")
    )
}

fn print_help() {
    println!("🥊 Fight Stats Analyzer");
    println!();
    println!("USAGE:");
    println!("    fight-stats-analyzer [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    (no flags)            Launch GUI interface");
    println!("    --gui                 Launch GUI interface");
    println!("    --analyze, -a         Match a template in an image without the GUI");
    println!("    --image=PATH          Source image for --analyze");
    println!("    --template=PATH       Template image for --analyze");
    println!("    --threshold=F         Match threshold 0.10-1.00 (default: 0.70)");
    println!("    --method=NAME         sqdiff, sqdiff-normed, ccorr, ccorr-normed,");
    println!("                          ccoeff, ccoeff-normed (default: ccoeff-normed)");
    println!("    --out=PATH            Write the annotated image as PNG");
    println!("    --json                Print the match summary as JSON");
    println!("    --camera=<ffmpeg|replay>  Camera backend for the GUI (default: ffmpeg)");
    println!("    --replay-dir=DIR      Frame directory for the replay camera");
    println!("    --debug               Enable debug logging");
    println!("    --help, -h            Show this help message");
    println!("    --version, -v         Show version information");
    println!();
    println!("ENVIRONMENT:");
    println!("    CAMERA_IMPL, FFMPEG_PATH, CAMERA_INPUT_FORMAT,");
    println!("    CAMERA_FRONT_DEVICE, CAMERA_REAR_DEVICE, CAMERA_REPLAY_DIR, RUST_LOG");
    println!();
    println!("EXAMPLES:");
    println!("    fight-stats-analyzer");
    println!("    fight-stats-analyzer --camera=replay --replay-dir=./frames");
    println!("    fight-stats-analyzer --analyze --image=round1.png --template=hp-bar.png --out=found.png");
    println!("    fight-stats-analyzer -a --image=a.jpg --template=b.png --method=sqdiff-normed --json");
}
