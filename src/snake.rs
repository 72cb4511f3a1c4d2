use std::collections::VecDeque;

use crate::Point;
use crate::config::GameConfig;
use MoveResult::*;

/// Segments right behind the head that never count for self-collision.
const COLLISION_GRACE_SEGMENTS: usize = 3;

/// Movement angle in degrees plus its cached unit vector.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Direction {
    angle: i32,
    dx: f64,
    dy: f64,
}

pub enum MoveResult {
    Moved { new_head: Point },
    Crashed,
}

pub struct Snake {
    body: VecDeque<Point>,
    length: usize,
    heading: Direction,
    score: u32,
    speed: f64,
    flying: bool,
    flight_timer: u32,
}

impl Direction {
    pub fn new(angle: i32) -> Self {
        let angle = angle.rem_euclid(360);
        let rad = (angle as f64).to_radians();
        Direction { angle, dx: round2(rad.cos()), dy: round2(rad.sin()) }
    }

    pub fn angle(&self) -> i32 {
        self.angle
    }

    pub fn vector(&self) -> (f64, f64) {
        (self.dx, self.dy)
    }

    pub fn turn(&mut self, delta: i32) {
        *self = Direction::new(self.angle + delta);
    }
}

impl Snake {
    pub fn new(center: Point, speed: f64) -> Self {
        let mut body = VecDeque::new();
        body.push_back(center);

        Snake {
            body,
            length: 1,
            heading: Direction::new(0),
            score: 0,
            speed,
            flying: false,
            flight_timer: 0,
        }
    }

    pub fn head(&self) -> Point {
        self.body[0]
    }

    pub fn body(&self) -> &VecDeque<Point> {
        &self.body
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_flying(&self) -> bool {
        self.flying
    }

    pub fn flight_timer(&self) -> u32 {
        self.flight_timer
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.speed = speed;
    }

    pub fn add_score(&mut self, points: u32) {
        self.score += points;
    }

    pub fn grow(&mut self) {
        self.length += 1;
    }

    pub fn turn(&mut self, delta: i32) {
        self.heading.turn(delta);
    }

    /// Distance covered in one tick, inversely proportional to the tick delay.
    pub fn move_distance(&self, config: &GameConfig) -> f64 {
        config.block_size * (config.reference_speed / self.speed)
    }

    pub fn update(&mut self, config: &GameConfig) -> MoveResult {
        if self.flying {
            self.flight_timer = self.flight_timer.saturating_sub(1);
            if self.flight_timer == 0 {
                self.flying = false;
            }
        }

        let (x, y) = self.head();
        let (dx, dy) = self.heading.vector();
        let step = self.move_distance(config);
        let new_head = (
            wrap(x + dx * step, config.board_width),
            wrap(y + dy * step, config.board_height),
        );

        if !self.flying {
            let reach = config.block_size / 2.0;
            let hit = self.body.iter().skip(COLLISION_GRACE_SEGMENTS)
                .any(|&(bx, by)| (new_head.0 - bx).abs() < reach && (new_head.1 - by).abs() < reach);
            if hit {
                return Crashed;
            }
        }

        self.body.push_front(new_head);
        self.body.truncate(self.length);

        Moved { new_head }
    }

    /// Back to a single segment at the center, heading right, zero score.
    /// Flight state and speed are left alone.
    pub fn reset(&mut self, center: Point) {
        self.length = 1;
        self.body.clear();
        self.body.push_back(center);
        self.heading = Direction::new(0);
        self.score = 0;
    }

    pub fn transform_to_dragonfly(&mut self, ticks: u32) {
        self.flying = true;
        self.flight_timer = ticks;
    }

    #[cfg(test)]
    pub(crate) fn set_body(&mut self, points: &[Point]) {
        self.body = points.iter().copied().collect();
        self.length = points.len();
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Euclidean remainder that never lands on `bound` itself.
fn wrap(v: f64, bound: f64) -> f64 {
    let r = v.rem_euclid(bound);
    if r >= bound { 0.0 } else { r }
}
