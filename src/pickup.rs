use rand::Rng;

use crate::Point;
use crate::config::GameConfig;

pub struct Food {
    position: Point,
}

pub struct Sunflower {
    position: Point,
    active: bool,
}

impl Food {
    pub fn new<R: Rng>(config: &GameConfig, rng: &mut R) -> Self {
        Food { position: random_cell(config, rng) }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn randomize_position<R: Rng>(&mut self, config: &GameConfig, rng: &mut R) {
        self.position = random_cell(config, rng);
    }

    #[cfg(test)]
    pub(crate) fn place_at(&mut self, position: Point) {
        self.position = position;
    }
}

impl Sunflower {
    pub fn new<R: Rng>(config: &GameConfig, rng: &mut R) -> Self {
        Sunflower { position: random_cell(config, rng), active: true }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Moves to a fresh cell and becomes collectable again.
    pub fn randomize_position<R: Rng>(&mut self, config: &GameConfig, rng: &mut R) {
        self.position = random_cell(config, rng);
        self.active = true;
    }

    #[cfg(test)]
    pub(crate) fn place_at(&mut self, position: Point) {
        self.position = position;
        self.active = true;
    }
}

/// Top-left corner of a uniformly chosen block on the grid.
pub fn random_cell<R: Rng>(config: &GameConfig, rng: &mut R) -> Point {
    let (cols, rows) = config.grid_cells();
    let col = rng.gen_range(0..cols);
    let row = rng.gen_range(0..rows);
    (col as f64 * config.block_size, row as f64 * config.block_size)
}

/// Pickup hit test: both axes closer than one block.
pub fn touches(head: Point, pickup: Point, block_size: f64) -> bool {
    (head.0 - pickup.0).abs() < block_size && (head.1 - pickup.1).abs() < block_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn random_cells_stay_on_grid() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..2000 {
            let (x, y) = random_cell(&config, &mut rng);
            assert!(x >= 0.0 && x <= config.board_width - config.block_size);
            assert!(y >= 0.0 && y <= config.board_height - config.block_size);
            assert_eq!(x % config.block_size, 0.0);
            assert_eq!(y % config.block_size, 0.0);
        }
    }

    #[test]
    fn sunflower_reactivates_on_randomize() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut sunflower = Sunflower::new(&config, &mut rng);
        assert!(sunflower.is_active());

        sunflower.deactivate();
        assert!(!sunflower.is_active());
        sunflower.randomize_position(&config, &mut rng);
        assert!(sunflower.is_active());
    }

    #[test]
    fn touch_needs_both_axes_within_a_block() {
        assert!(touches((100.0, 100.0), (119.0, 81.0), 20.0));
        assert!(!touches((100.0, 100.0), (120.0, 100.0), 20.0));
        assert!(!touches((100.0, 100.0), (100.0, 79.0), 20.0));
    }
}
