use fight_stats_analyzer::args::{Args, Mode};
use fight_stats_analyzer::cli::{format_summary, run_analyze};
use fight_stats_analyzer::gui::dioxus_app::run_gui;

fn main() {
    let Some(args) = Args::parse() else {
        return;
    };

    let default_level = if args.debug_mode { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match args.mode {
        Mode::Gui => {
            println!(
                "🚀 Launching Fight Stats Analyzer GUI (camera='{}')...",
                args.camera.backend.as_str()
            );
            run_gui(args.camera);
        }
        Mode::Analyze(analyze) => {
            let rt = match tokio::runtime::Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("❌ Failed to start runtime: {}", e);
                    std::process::exit(1);
                }
            };
            let result = rt.block_on(run_analyze(&analyze, &args.camera));
            match result.and_then(|analysis| format_summary(&analysis, analyze.json)) {
                Ok(text) => println!("{}", text),
                Err(e) => {
                    eprintln!("❌ {}", e.user_message());
                    std::process::exit(1);
                }
            }
        }
    }
}
