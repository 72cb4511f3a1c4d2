use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};
use tracing::{debug, info, trace};

use crate::Point;
use crate::config::GameConfig;
use crate::pickup::{self, Food, Sunflower};
use crate::slider::SpeedSlider;
use crate::snake::{MoveResult, Snake};

/// Player intent, already translated into logical board coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Command {
    Turn(i32),
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
}

/// What happened during a single tick.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TickReport {
    pub crashed: bool,
    pub ate_food: bool,
    pub sunflowers_eaten: usize,
}

pub struct World {
    config: GameConfig,
    snake: Snake,
    food: Food,
    sunflowers: Vec<Sunflower>,
    slider: SpeedSlider,
    rng: StdRng,
}

impl World {
    pub fn new(config: GameConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let slider = SpeedSlider::new(&config);
        let snake = Snake::new(config.board_center(), slider.value());
        let food = Food::new(&config, &mut rng);
        let sunflowers = (0..config.sunflower_count)
            .map(|_| Sunflower::new(&config, &mut rng))
            .collect();

        World { config, snake, food, sunflowers, slider, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn sunflowers(&self) -> &[Sunflower] {
        &self.sunflowers
    }

    pub fn slider(&self) -> &SpeedSlider {
        &self.slider
    }

    /// Current tick delay in seconds.
    pub fn tick_delay(&self) -> f64 {
        self.slider.value()
    }

    /// Whole seconds of flight left, at the nominal tick rate.
    pub fn flight_seconds_left(&self) -> Option<u32> {
        if self.snake.is_flying() {
            Some(self.snake.flight_timer() / self.config.nominal_tps)
        } else {
            None
        }
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::Turn(delta) => {
                self.snake.turn(delta);
                debug!(angle = self.snake.heading().angle(), "turned");
            }
            Command::PointerDown(pos) => self.slider.pointer_down(pos),
            Command::PointerMove(pos) => {
                if let Some(value) = self.slider.pointer_move(pos) {
                    debug!(delay_ms = value * 1000.0, "slider moved");
                }
            }
            Command::PointerUp => self.slider.pointer_up(),
        }
    }

    pub fn tick(&mut self) -> TickReport {
        let mut report = TickReport::default();

        self.snake.set_speed(self.slider.value());

        match self.snake.update(&self.config) {
            MoveResult::Moved { new_head } => trace!(x = new_head.0, y = new_head.1, "snake moved"),
            MoveResult::Crashed => {
                info!(score = self.snake.score(), length = self.snake.length(), "snake bit itself, resetting");
                self.reset();
                report.crashed = true;
            }
        }

        let head = self.snake.head();
        let block = self.config.block_size;

        if pickup::touches(head, self.food.position(), block) {
            self.snake.grow();
            self.snake.add_score(1);
            self.food.randomize_position(&self.config, &mut self.rng);
            report.ate_food = true;
            debug!(score = self.snake.score(), length = self.snake.length(), "food eaten");
        }

        for i in 0..self.sunflowers.len() {
            let sunflower = &self.sunflowers[i];
            if !sunflower.is_active() || !pickup::touches(head, sunflower.position(), block) {
                continue;
            }

            self.sunflowers[i].deactivate();
            self.snake.transform_to_dragonfly(self.config.flight_ticks);
            self.snake.add_score(self.config.sunflower_bonus);
            report.sunflowers_eaten += 1;
            info!(score = self.snake.score(), "sunflower eaten, flying");

            if self.rng.gen_bool(self.config.sunflower_respawn_chance) {
                self.respawn_sunflower(i);
            }
        }

        report
    }

    fn reset(&mut self) {
        self.snake.reset(self.config.board_center());
        self.food.randomize_position(&self.config, &mut self.rng);
        for sunflower in self.sunflowers.iter_mut() {
            sunflower.randomize_position(&self.config, &mut self.rng);
        }
    }

    fn respawn_sunflower(&mut self, eaten: usize) {
        let candidates: Vec<usize> = (0..self.sunflowers.len())
            .filter(|&j| j != eaten && !self.sunflowers[j].is_active())
            .collect();

        if let Some(&j) = candidates.choose(&mut self.rng) {
            self.sunflowers[j].randomize_position(&self.config, &mut self.rng);
            debug!(index = j, "sunflower respawned");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> World {
        let config = GameConfig { seed: Some(42), ..GameConfig::default() };
        let mut world = World::new(config);
        world.park_pickups();
        world
    }

    impl World {
        /// Moves every pickup to a corner the snake will not reach in a test.
        fn park_pickups(&mut self) {
            self.food.place_at((0.0, 580.0));
            for sunflower in self.sunflowers.iter_mut() {
                sunflower.place_at((0.0, 580.0));
                sunflower.deactivate();
            }
        }
    }

    #[test]
    fn one_tick_without_input_moves_head_right() {
        let mut world = world();
        let report = world.tick();

        assert_eq!(report, TickReport::default());
        assert_eq!(world.snake().head(), (400.0 + 20.0 * (0.2 / 0.2), 300.0));
        assert_eq!(world.snake().length(), 1);
    }

    #[test]
    fn food_grows_snake_and_scores_one() {
        let mut world = world();
        world.food.place_at((420.0, 300.0));

        let report = world.tick();
        assert!(report.ate_food);
        assert_eq!(world.snake().length(), 2);
        assert_eq!(world.snake().score(), 1);

        let (x, y) = world.food().position();
        assert!(x >= 0.0 && x <= 780.0 && x % 20.0 == 0.0);
        assert!(y >= 0.0 && y <= 580.0 && y % 20.0 == 0.0);
    }

    #[test]
    fn sunflower_gives_flight_and_bonus() {
        let mut world = world();
        world.sunflowers[1].place_at((410.0, 290.0));

        let report = world.tick();
        assert_eq!(report.sunflowers_eaten, 1);
        assert!(!world.sunflowers()[1].is_active());
        assert!(world.snake().is_flying());
        assert_eq!(world.snake().flight_timer(), 300);
        assert_eq!(world.snake().score(), 5);
        assert_eq!(world.flight_seconds_left(), Some(10));
    }

    #[test]
    fn inactive_sunflower_is_ignored() {
        let mut world = world();
        world.sunflowers[0].place_at((420.0, 300.0));
        world.sunflowers[0].deactivate();

        let report = world.tick();
        assert_eq!(report.sunflowers_eaten, 0);
        assert!(!world.snake().is_flying());
    }

    #[test]
    fn respawn_never_revives_the_eaten_sunflower() {
        for seed in 0..64 {
            let config = GameConfig { seed: Some(seed), ..GameConfig::default() };
            let mut world = World::new(config);
            world.park_pickups();

            world.respawn_sunflower(0);
            assert!(!world.sunflowers()[0].is_active());
            let revived = world.sunflowers().iter().filter(|s| s.is_active()).count();
            assert_eq!(revived, 1);
        }
    }

    #[test]
    fn certain_respawn_revives_another_sunflower() {
        let config = GameConfig { seed: Some(3), sunflower_respawn_chance: 1.0, ..GameConfig::default() };
        let mut world = World::new(config);
        world.park_pickups();
        world.sunflowers[0].place_at((420.0, 300.0));

        let report = world.tick();
        assert!(report.sunflowers_eaten >= 1);
        assert!(world.sunflowers().iter().any(|s| s.is_active()));
    }

    #[test]
    fn self_collision_resets_everything() {
        let mut world = world();
        // A 30 degree step from (100, 100) lands on (117.4, 110.0)
        world.snake.set_body(&[(100.0, 100.0), (90.0, 100.0), (80.0, 100.0), (70.0, 100.0), (117.0, 110.0)]);
        world.snake.add_score(9);
        world.snake.turn(30);

        let report = world.tick();
        assert!(report.crashed);

        // Fresh pickups may land on the center cell and be collected in the same tick.
        let food = report.ate_food as usize;
        let bonus = report.sunflowers_eaten as u32 * 5;
        assert_eq!(world.snake().length(), 1 + food);
        assert_eq!(world.snake().score(), food as u32 + bonus);
        assert_eq!(world.snake().head(), (400.0, 300.0));
        assert_eq!(world.snake().heading().angle(), 0);
        let active = world.sunflowers().iter().filter(|s| s.is_active()).count();
        assert!(active >= 3usize.saturating_sub(report.sunflowers_eaten));
    }

    #[test]
    fn no_collision_while_flying() {
        let mut world = world();
        world.snake.set_body(&[(100.0, 100.0), (90.0, 100.0), (80.0, 100.0), (70.0, 100.0), (120.0, 100.0)]);
        world.snake.transform_to_dragonfly(300);

        let report = world.tick();
        assert!(!report.crashed);
        assert_eq!(world.snake().head(), (120.0, 100.0));
        assert_eq!(world.snake().length(), 5);
    }

    #[test]
    fn slider_drag_changes_speed_and_step() {
        let mut world = world();
        let knob = world.slider().knob();

        world.apply(Command::PointerDown((knob.center_x(), knob.center_y())));
        world.apply(Command::PointerMove((680.0, 25.0)));
        world.apply(Command::PointerUp);

        let delay = world.tick_delay();
        assert!(delay > 0.001 && delay < 0.2);

        world.tick();
        let expected = 400.0 + 20.0 * (0.2 / delay);
        assert!((world.snake().head().0 - expected).abs() < 1e-9);
    }

    #[test]
    fn turn_command_rotates_heading() {
        let mut world = world();
        world.apply(Command::Turn(-15));
        assert_eq!(world.snake().heading().angle(), 345);
        world.apply(Command::Turn(15));
        assert_eq!(world.snake().heading().angle(), 0);
    }
}
