//! Headless maze chase runner.
//!
//! This binary runs the game without a terminal UI, controlled via JSON on
//! stdin/stdout. Designed for scripted agents and CI testing.
//!
//! # Usage
//!
//! ```bash
//! # Interactive mode - read commands from stdin
//! cargo run -p chase_headless
//!
//! # Same, with state after every cycle and a faster heartbeat
//! cargo run -p chase_headless -- run --auto-state --heartbeat-ms 50
//!
//! # Play a scripted scenario and check its expectations
//! cargo run -p chase_headless -- script --file scenarios/first_steps.ron
//!
//! # Print the opening board
//! cargo run -p chase_headless -- render
//! ```
//!
//! # Protocol
//!
//! Input (stdin): JSON commands, one per line
//! Output (stdout): JSON responses, one per line
//! Logs (stderr): Debug information
//!
//! See the protocol module for command/response format.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chase_core::config::GameConfig;
use chase_core::session::Session;
use chase_core::store::{MemoryScoreStore, ScoreStore};
use chase_headless::{
    ascii_visualizer::{render_frame, AsciiConfig},
    runner::{HeadlessConfig, HeadlessRunner},
    scenario::Scenario,
    score_file::{default_score_path, FileScoreStore},
};

#[derive(Parser)]
#[command(name = "chase_headless")]
#[command(about = "Headless maze chase runner for scripted play and CI")]
#[command(version)]
struct Cli {
    /// Enable verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Engine configuration (RON); defaults are used for missing fields
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// High-score file [default: highscore.json in the user config directory]
    #[arg(long, global = true)]
    score_file: Option<PathBuf>,

    /// Keep the high score in memory only
    #[arg(long, global = true, conflicts_with = "score_file")]
    no_save: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive game over stdin/stdout
    Run {
        /// Output state after every command that ran a cycle
        #[arg(long)]
        auto_state: bool,

        /// Virtual milliseconds between heartbeats
        #[arg(long, default_value = "100")]
        heartbeat_ms: u64,
    },

    /// Play a RON scenario and check its expectations
    Script {
        /// Scenario file path
        #[arg(short, long)]
        file: PathBuf,

        /// Virtual milliseconds between heartbeats
        #[arg(long, default_value = "100")]
        heartbeat_ms: u64,
    },

    /// Print the opening board
    Render {
        /// Disable colored output
        #[arg(long)]
        no_color: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging to stderr (stdout is for protocol)
    let log_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .with(tracing_subscriber::filter::LevelFilter::from_level(
            log_level,
        ))
        .init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => fatal(&e),
    };

    let command = cli.command.unwrap_or(Commands::Run {
        auto_state: false,
        heartbeat_ms: 100,
    });

    if cli.no_save {
        dispatch(command, config, MemoryScoreStore::default());
    } else {
        let path = cli.score_file.unwrap_or_else(default_score_path);
        tracing::debug!(path = %path.display(), "Using high score file");
        dispatch(command, config, FileScoreStore::new(path));
    }
}

fn dispatch<S: ScoreStore>(command: Commands, config: Option<GameConfig>, store: S) {
    match command {
        Commands::Run {
            auto_state,
            heartbeat_ms,
        } => cmd_run(config.unwrap_or_default(), store, auto_state, heartbeat_ms),
        Commands::Script { file, heartbeat_ms } => cmd_script(&file, config, store, heartbeat_ms),
        Commands::Render { no_color } => cmd_render(config.unwrap_or_default(), store, no_color),
    }
}

fn fatal(message: &str) -> ! {
    tracing::error!(%message, "Fatal error");
    eprintln!("FATAL: {}", message);
    std::process::exit(1);
}

fn load_config(path: Option<&Path>) -> Result<Option<GameConfig>, String> {
    let Some(path) = path else {
        return Ok(None);
    };
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config '{}': {}", path.display(), e))?;
    let config: GameConfig = ron::from_str(&text)
        .map_err(|e| format!("Cannot parse config '{}': {}", path.display(), e))?;
    tracing::info!(path = %path.display(), seed = config.seed, "Loaded configuration");
    Ok(Some(config))
}

/// Run a single interactive game
fn cmd_run<S: ScoreStore>(config: GameConfig, store: S, auto_state: bool, heartbeat_ms: u64) {
    tracing::info!(seed = config.seed, heartbeat_ms, "Starting interactive session");

    let session = match Session::new(config, store) {
        Ok(session) => session,
        Err(e) => fatal(&e.to_string()),
    };
    let mut runner = HeadlessRunner::new(
        session,
        HeadlessConfig {
            heartbeat_ms,
            auto_state,
        },
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    if let Err(e) = runner.run(stdin.lock(), stdout.lock()) {
        fatal(&format!("I/O error: {}", e));
    }
}

/// Play a scenario file
fn cmd_script<S: ScoreStore>(
    file: &Path,
    config: Option<GameConfig>,
    store: S,
    heartbeat_ms: u64,
) {
    let mut scenario = match Scenario::load(file) {
        Ok(scenario) => scenario,
        Err(e) => fatal(&e.to_string()),
    };
    if let Some(config) = config {
        scenario = scenario.with_default_config(config);
    }

    let headless = HeadlessConfig {
        heartbeat_ms,
        ..HeadlessConfig::default()
    };
    let report = match scenario.run(store, &headless) {
        Ok(report) => report,
        Err(e) => fatal(&e.to_string()),
    };

    for frame in &report.frames {
        println!("{frame}");
    }

    eprintln!("\n{}", "=".repeat(50));
    eprintln!("SCENARIO: {}", report.name);
    eprintln!("{}", "=".repeat(50));
    eprintln!("Virtual time: {:.1}s", Duration::from_millis(report.now_ms).as_secs_f64());
    eprintln!("Phase: {:?}", report.snapshot.phase);
    eprintln!("Level: {}", report.snapshot.level);
    eprintln!("Score: {}", report.snapshot.score);
    eprintln!("Lives: {}", report.snapshot.player.lives);

    if report.passed() {
        eprintln!("Result: PASSED");
    } else {
        eprintln!("Result: FAILED");
        for failure in &report.failures {
            eprintln!("  - {failure}");
        }
        std::process::exit(1);
    }
}

/// Print the opening board
fn cmd_render<S: ScoreStore>(config: GameConfig, store: S, no_color: bool) {
    let session = match Session::new(config, store) {
        Ok(session) => session,
        Err(e) => fatal(&e.to_string()),
    };
    let ascii = AsciiConfig {
        use_color: !no_color,
        ..AsciiConfig::default()
    };
    print!("{}", render_frame(&session.snapshot(Duration::ZERO), &ascii));
}
