use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use grid_snake::config::GameConfig;
use grid_snake::engine::SimulationEngine;
use grid_snake::error::Result;
use grid_snake::game_loop::{FixedRateClock, GameLoop};
use grid_snake::input::KeyboardInput;
use grid_snake::placement::RngSource;
use grid_snake::renderer::TerminalRenderer;
use grid_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// JSON config file; defaults to the per-user config when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Playfield width in pixels.
    #[arg(long)]
    width: Option<u32>,

    /// Playfield height in pixels.
    #[arg(long)]
    height: Option<u32>,

    /// Edge length of one cell in pixels.
    #[arg(long = "cell-size")]
    cell_size: Option<u32>,

    /// Number of stones on the board.
    #[arg(long)]
    stones: Option<usize>,

    /// Ticks per second.
    #[arg(long)]
    speed: Option<u32>,

    /// Seed for reproducible item placement.
    #[arg(long)]
    seed: Option<u64>,

    /// Write diagnostics to this file (filter with RUST_LOG).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut GameConfig) {
        if let Some(width) = self.width {
            config.screen_width = width;
        }
        if let Some(height) = self.height {
            config.screen_height = height;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(stones) = self.stones {
            config.stone_count = stones;
        }
        if let Some(speed) = self.speed {
            config.ticks_per_second = speed;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(path) = &cli.log_file {
        if let Err(error) = init_logging(path) {
            eprintln!("Failed to open log file {}: {error}", path.display());
            return ExitCode::FAILURE;
        }
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(%error, "fatal");
            eprintln!("grid-snake: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load_from_path(path)?,
        None => GameConfig::load_default()?,
    };
    cli.apply_overrides(&mut config);
    config.validate()?;

    let source = match config.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let engine = SimulationEngine::new(&config, source)?;
    info!(
        width = config.screen_width,
        height = config.screen_height,
        cell_size = config.cell_size,
        stones = config.stone_count,
        ticks_per_second = config.ticks_per_second,
        seed = ?config.seed,
        "game_started"
    );

    install_panic_hook();
    let session = TerminalSession::enter()?;
    let renderer = TerminalRenderer::new(session.terminal()?);
    let mut game = GameLoop::new(
        engine,
        KeyboardInput::new(),
        renderer,
        FixedRateClock::new(config.ticks_per_second),
    );

    let outcome = game.run();
    drop(session);

    info!(resets = game.resets(), "shutdown");
    outcome
}

fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();

    Ok(())
}
