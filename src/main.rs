//! Command-line entry point: load config and map, then play in the terminal.

use clap::Parser;
use gridwalk::{load_map, session, Game, GameConfig, GameError, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Walk a tile map with a guard, a portal and a trap")]
struct Args {
    /// Map file to play.
    #[arg(default_value = "map.txt")]
    map: PathBuf,
    /// Config file (defaults to ./gridwalk.toml if present).
    #[arg(long)]
    config: Option<PathBuf>,
    /// Log file, overriding the config.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fatal");
            eprintln!("gridwalk: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = GameConfig::load(args.config.as_deref())?;
    let log_file = args.log_file.as_deref().unwrap_or(config.log.file.as_path());
    init_tracing(log_file, &config.log.level)?;
    info!(map = %args.map.display(), "=== gridwalk startup ===");

    let map = load_map(&args.map)?;
    let mut game = Game::start(map.into_world(), &config)?;
    let outcome = session::run(&mut game, &config);
    game.shutdown();
    outcome
}

/// The terminal belongs to the game, so logs go to a file.
fn init_tracing(path: &Path, level: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| GameError::LogFile {
            path: path.to_path_buf(),
            source,
        })?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
    Ok(())
}
