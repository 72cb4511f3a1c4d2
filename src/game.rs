use std::{thread::sleep, time::{Duration, Instant}};

use crate::{Coords, Point};
use crate::assets::Assets;
use crate::canvas::{Canvas, Cell};
use crate::config::GameConfig;
use crate::term::TermManager;
use crate::world::{Command, World};

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use crossterm::style::Color;
use tracing::{debug, info};

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = '█';
const TRACK_CHAR: char = '▬';
const KNOB_CHAR: char = '█';

const SNAKE_COLOR: Color = Color::Green;
const FOOD_COLOR: Color = Color::Red;
const SUNFLOWER_COLOR: Color = Color::Yellow;
const DRAGONFLY_COLOR: Color = Color::Cyan;
const TRACK_COLOR: Color = Color::Grey;
const KNOB_COLOR: Color = Color::Blue;
const TEXT_COLOR: Color = Color::White;
const FLIGHT_TEXT_COLOR: Color = Color::Blue;

/// Owns the terminal, the loaded sprites and the world for the whole run.
pub struct SnakeGame {
    paused: bool,
    term: TermManager,
    canvas: Canvas,
    assets: Assets,
    world: World,
}

enum Flow {
    Continue,
    Quit,
}

impl SnakeGame {
    pub fn new(config: GameConfig, assets: Assets) -> Result<Self> {
        let term = TermManager::new()?;
        let canvas = Canvas::new(term.get_terminal_size(), config.board_width, config.board_height);
        let world = World::new(config);
        Ok(SnakeGame { paused: false, term, canvas, assets, world })
    }

    pub fn initialize(&mut self) -> Result<()> {
        self.term.setup()?;
        let (cols, rows) = self.term.get_terminal_size();
        info!(cols, rows, "terminal ready");
        Ok(())
    }

    /// Returns false when the player quits from the intro screen.
    pub fn show_intro(&mut self) -> Result<bool> {
        let lines = &[
            "Left/Right arrows (or A/D) to steer",
            "Drag the speed knob with the mouse",
            "Sunflowers turn you into a dragonfly",
            "Esc to pause",
            "Q or CTRL+C to quit",
            "",
            "Press any key to begin",
        ];

        self.term.show_message(lines)?;
        let key = self.term.read_key_blocking()?;
        self.term.hide_message()?;

        if is_quit(&key) {
            return Ok(false);
        }

        self.sync_canvas_size();
        Ok(true)
    }

    pub fn play(&mut self) -> Result<()> {
        loop {
            let frame_start = Instant::now();

            for ev in self.term.read_events_queue()? {
                if let Flow::Quit = self.handle_event(ev)? {
                    return Ok(());
                }
            }

            if self.paused {
                sleep(Duration::from_millis(10));
                continue;
            }

            self.world.tick();

            self.draw();
            self.term.present(&self.canvas)?;

            // The slider value is the target interval between frames
            let frame = Duration::from_secs_f64(self.world.tick_delay());
            if let Some(rest) = frame.checked_sub(frame_start.elapsed()) {
                sleep(rest);
            }
        }
    }

    pub fn shutdown(&mut self) -> Result<()> {
        info!(score = self.world.snake().score(), "shutting down");
        self.term.restore()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn handle_event(&mut self, ev: Event) -> Result<Flow> {
        match ev {
            Event::Key(key) if is_quit(&key) => return Ok(Flow::Quit),
            Event::Key(KeyEvent { code: KeyCode::Esc, .. }) => self.toggle_pause()?,
            Event::Key(KeyEvent { code, .. }) => {
                if let Some(command) = key_command(code, self.world.config().turn_step) {
                    self.command(command);
                }
            }
            Event::Mouse(MouseEvent { kind: MouseEventKind::Down(MouseButton::Left), column, row, .. }) => {
                let pos = self.press_position((column, row));
                self.command(Command::PointerDown(pos));
            }
            Event::Mouse(MouseEvent { kind: MouseEventKind::Drag(MouseButton::Left), column, row, .. }) => {
                let pos = self.canvas.to_logical((column, row));
                self.command(Command::PointerMove(pos));
            }
            Event::Mouse(MouseEvent { kind: MouseEventKind::Up(_), .. }) => self.command(Command::PointerUp),
            Event::Mouse(_) => {}
            Event::Resize(cols, rows) => {
                debug!(cols, rows, "terminal resized");
                self.sync_canvas_size();
                self.term.clear()?;
                if self.paused {
                    self.draw();
                    self.term.present(&self.canvas)?;
                    self.term.show_message(PAUSE_MESSAGE)?;
                }
            }
        }

        Ok(Flow::Continue)
    }

    /// The knob can be smaller than a terminal cell, so pressing the cell it
    /// is drawn in counts as pressing its center.
    fn press_position(&self, cell: Coords) -> Point {
        let knob = self.world.slider().knob();
        let center = (knob.center_x(), knob.center_y());
        if self.canvas.to_cell(center) == Some(cell) {
            center
        } else {
            self.canvas.to_logical(cell)
        }
    }

    fn command(&mut self, command: Command) {
        if !self.paused {
            self.world.apply(command);
        }
    }

    fn toggle_pause(&mut self) -> Result<()> {
        if !self.paused {
            self.term.show_message(PAUSE_MESSAGE)?;
        } else {
            self.term.hide_message()?;
        }

        self.paused = !self.paused;
        info!(paused = self.paused, "pause toggled");
        Ok(())
    }

    fn sync_canvas_size(&mut self) {
        let size = self.term.get_terminal_size();
        if self.canvas.size() != size {
            let config = self.world.config();
            self.canvas = Canvas::new(size, config.board_width, config.board_height);
        }
    }

    fn draw(&mut self) {
        let world = &self.world;
        let canvas = &mut self.canvas;
        let block = world.config().block_size;
        let half = block / 2.0;

        canvas.clear();

        let snake = world.snake();
        for (i, &(x, y)) in snake.body().iter().enumerate() {
            if i == 0 && snake.is_flying() {
                canvas.sprite((x - half, y - half), &self.assets.dragonfly, DRAGONFLY_COLOR);
            } else {
                canvas.fill_rect(x - half, y - half, block, block, Cell::new(SNAKE_BODY_CHAR, SNAKE_COLOR));
            }
        }

        let (fx, fy) = world.food().position();
        canvas.fill_rect(fx, fy, block, block, Cell::new(FOOD_CHAR, FOOD_COLOR));

        for sunflower in world.sunflowers().iter().filter(|s| s.is_active()) {
            canvas.sprite(sunflower.position(), &self.assets.sunflower, SUNFLOWER_COLOR);
        }

        let slider = world.slider();
        let track = slider.track();
        let knob = slider.knob();
        canvas.fill_rect(track.x, track.y, track.width, track.height, Cell::new(TRACK_CHAR, TRACK_COLOR));
        if let Some(cell) = canvas.to_cell((knob.center_x(), knob.center_y())) {
            canvas.put(cell, Cell::new(KNOB_CHAR, KNOB_COLOR));
        }
        let label = format!("Speed: {:.0} ms", slider.value() * 1000.0);
        canvas.text((track.x, (track.y - 20.0).max(0.0)), &label, TEXT_COLOR);

        canvas.text((10.0, 10.0), &format!("Score: {}", snake.score()), TEXT_COLOR);
        if let Some(secs) = world.flight_seconds_left() {
            canvas.text((10.0, 50.0), &format!("Dragonfly: {}s", secs), FLIGHT_TEXT_COLOR);
        }
    }
}

const PAUSE_MESSAGE: &[&str] = &["Paused", "Press Esc to resume", "or Q to quit"];

/// Steering keys. Left adds to the angle, right subtracts from it.
fn key_command(code: KeyCode, step: i32) -> Option<Command> {
    match code {
        KeyCode::Char('a') | KeyCode::Left => Some(Command::Turn(step)),
        KeyCode::Char('d') | KeyCode::Right => Some(Command::Turn(-step)),
        _ => None,
    }
}

fn is_quit(ev: &KeyEvent) -> bool {
    matches!(ev, KeyEvent { code: KeyCode::Char('c'), modifiers: KeyModifiers::CONTROL })
        || matches!(ev, KeyEvent { code: KeyCode::Char('q'), .. })
}
