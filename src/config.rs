use std::{env, path::PathBuf};

use anyhow::{Context, Result};

/// Fixed tuning values of the game.
pub struct Params;

impl Params {
    // Board, in logical units
    pub const BOARD_WIDTH: f64 = 800.0;
    pub const BOARD_HEIGHT: f64 = 600.0;
    pub const BLOCK_SIZE: f64 = 20.0;

    // Snake
    pub const TURN_STEP_DEG: i32 = 15;
    pub const REFERENCE_SPEED: f64 = 0.2;
    pub const FLIGHT_TICKS: u32 = 300;
    pub const NOMINAL_TICKS_PER_SEC: u32 = 30;

    // Pickups
    pub const SUNFLOWER_COUNT: usize = 3;
    pub const SUNFLOWER_BONUS: u32 = 5;
    pub const SUNFLOWER_RESPAWN_CHANCE: f64 = 0.3;

    // Slider
    pub const SLIDER_WIDTH: f64 = 200.0;
    pub const SLIDER_HEIGHT: f64 = 10.0;
    pub const SLIDER_MARGIN: f64 = 20.0;
    pub const SLIDER_Y: f64 = 20.0;
    pub const SLIDER_KNOB_SIZE: f64 = 20.0;
    pub const MIN_SPEED: f64 = 0.001;
    pub const MAX_SPEED: f64 = 1.0;
    pub const DEFAULT_SPEED: f64 = 0.2;
}

const DEFAULT_ASSETS_DIR: &str = "assets";
const DEFAULT_LOG_FILE: &str = "snake.log";

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub board_width: f64,
    pub board_height: f64,
    pub block_size: f64,
    pub turn_step: i32,
    pub reference_speed: f64,
    pub flight_ticks: u32,
    pub nominal_tps: u32,
    pub sunflower_count: usize,
    pub sunflower_bonus: u32,
    pub sunflower_respawn_chance: f64,
    pub slider_width: f64,
    pub slider_height: f64,
    pub slider_x: f64,
    pub slider_y: f64,
    pub knob_size: f64,
    pub min_speed: f64,
    pub max_speed: f64,
    pub default_speed: f64,
    pub assets_dir: PathBuf,
    pub log_file: PathBuf,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_width: Params::BOARD_WIDTH,
            board_height: Params::BOARD_HEIGHT,
            block_size: Params::BLOCK_SIZE,
            turn_step: Params::TURN_STEP_DEG,
            reference_speed: Params::REFERENCE_SPEED,
            flight_ticks: Params::FLIGHT_TICKS,
            nominal_tps: Params::NOMINAL_TICKS_PER_SEC,
            sunflower_count: Params::SUNFLOWER_COUNT,
            sunflower_bonus: Params::SUNFLOWER_BONUS,
            sunflower_respawn_chance: Params::SUNFLOWER_RESPAWN_CHANCE,
            slider_width: Params::SLIDER_WIDTH,
            slider_height: Params::SLIDER_HEIGHT,
            slider_x: Params::BOARD_WIDTH - Params::SLIDER_WIDTH - Params::SLIDER_MARGIN,
            slider_y: Params::SLIDER_Y,
            knob_size: Params::SLIDER_KNOB_SIZE,
            min_speed: Params::MIN_SPEED,
            max_speed: Params::MAX_SPEED,
            default_speed: Params::DEFAULT_SPEED,
            assets_dir: PathBuf::from(DEFAULT_ASSETS_DIR),
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Defaults overridden by `SNAKE_ASSETS_DIR`, `SNAKE_LOG_FILE` and `SNAKE_SEED`.
    pub fn from_env() -> Result<Self> {
        let mut config = GameConfig::default();

        if let Some(dir) = env::var_os("SNAKE_ASSETS_DIR") {
            config.assets_dir = PathBuf::from(dir);
        }

        if let Some(file) = env::var_os("SNAKE_LOG_FILE") {
            config.log_file = PathBuf::from(file);
        }

        if let Ok(seed) = env::var("SNAKE_SEED") {
            let seed = seed.trim().parse::<u64>()
                .with_context(|| format!("SNAKE_SEED must be an unsigned integer, got {:?}", seed))?;
            config.seed = Some(seed);
        }

        Ok(config)
    }

    /// Number of block-aligned cells along each axis of the play field.
    pub fn grid_cells(&self) -> (u32, u32) {
        let cols = ((self.board_width - self.block_size) / self.block_size).floor() as u32 + 1;
        let rows = ((self.board_height - self.block_size) / self.block_size).floor() as u32 + 1;
        (cols, rows)
    }

    pub fn board_center(&self) -> (f64, f64) {
        ((self.board_width / 2.0).floor(), (self.board_height / 2.0).floor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_covers_board() {
        let config = GameConfig::default();
        assert_eq!(config.grid_cells(), (40, 30));
        assert_eq!(config.board_center(), (400.0, 300.0));
    }

    #[test]
    fn slider_sits_in_top_right_corner() {
        let config = GameConfig::default();
        assert_eq!(config.slider_x, 580.0);
        assert_eq!(config.slider_x + config.slider_width, 780.0);
    }
}
