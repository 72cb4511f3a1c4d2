mod assets;
mod canvas;
mod config;
mod game;
mod pickup;
mod slider;
mod snake;
mod term;
mod world;

use std::{fs::File, sync::Mutex};

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::assets::Assets;
use crate::config::GameConfig;

pub type TermInt = u16;
pub type Coords = (u16, u16);
/// A position on the logical 800x600 board.
pub type Point = (f64, f64);

fn main() -> Result<()> {
    let config = GameConfig::from_env()?;
    init_logging(&config)?;
    info!(?config, "starting");

    let assets = Assets::load(&config.assets_dir)
        .context("could not load game assets")?;

    let mut game = game::SnakeGame::new(config, assets)?;
    let result = run(&mut game);

    // Leave the terminal usable no matter how the loop ended
    if let Err(err) = game.shutdown() {
        error!(?err, "failed to restore terminal");
    }

    result
}

fn run(game: &mut game::SnakeGame) -> Result<()> {
    game.initialize()?;
    if game.show_intro()? {
        // The main game loop returns once the player quits
        game.play()?;
    }
    Ok(())
}

fn init_logging(config: &GameConfig) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("failed to create log file {}", config.log_file.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
