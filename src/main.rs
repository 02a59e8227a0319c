use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use jnav::tui;
use jnav::utils::editor::EditorConfig;
use jnav::utils::fs::{read_json_file, read_json_stdin};
use jnav::AppState;

/// Interactive JSON tree explorer.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// JSON file to open; reads stdin when omitted.
    #[arg(long = "in", value_name = "PATH")]
    in_path: Option<PathBuf>,

    /// Title shown above the tree.
    #[arg(long, default_value = "JSON")]
    title: String,
}

/// `JNAV_LOG` overrides the default WARN level; unset or unparsable values
/// keep the default.
fn log_level(raw: Option<&str>) -> tracing::Level {
    raw.and_then(|v| v.trim().parse().ok())
        .unwrap_or(tracing::Level::WARN)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so they never fight the alternate screen on stdout.
    let _ = tracing_subscriber::fmt::SubscriberBuilder::default()
        .with_max_level(log_level(std::env::var("JNAV_LOG").ok().as_deref()))
        .with_writer(std::io::stderr)
        .try_init();

    let dom = match &cli.in_path {
        Some(path) => read_json_file(path),
        None => {
            if std::io::stdin().is_terminal() {
                eprintln!("no input: pass --in <PATH> or pipe a JSON document to stdin");
                return ExitCode::from(2);
            }
            read_json_stdin()
        }
    };
    let dom = match dom {
        Ok(dom) => dom,
        Err(e) => {
            eprintln!("failed to load document: {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut state = AppState::default();
    state.load_value(dom);

    let app = tui::App::new(state, cli.title, EditorConfig::from_env());
    match tui::run(app) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
