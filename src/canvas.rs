use crossterm::style::Color;

use crate::{Coords, Point, TermInt};
use crate::assets::Sprite;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub color: Color,
}

impl Cell {
    pub const BLANK: Cell = Cell { ch: ' ', color: Color::Reset };

    pub fn new(ch: char, color: Color) -> Self {
        Cell { ch, color }
    }
}

/// Off-screen frame in terminal cells, addressed in logical board units.
pub struct Canvas {
    cols: TermInt,
    rows: TermInt,
    logical_width: f64,
    logical_height: f64,
    cells: Vec<Cell>,
}

impl Canvas {
    pub fn new(size: Coords, logical_width: f64, logical_height: f64) -> Self {
        let (cols, rows) = size;
        let cells = vec![Cell::BLANK; cols as usize * rows as usize];
        Canvas { cols, rows, logical_width, logical_height, cells }
    }

    pub fn size(&self) -> Coords {
        (self.cols, self.rows)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn clear(&mut self) {
        for cell in self.cells.iter_mut() {
            *cell = Cell::BLANK;
        }
    }

    /// Terminal cell holding a logical point, `None` when off screen.
    pub fn to_cell(&self, (x, y): Point) -> Option<Coords> {
        if x < 0.0 || y < 0.0 {
            return None;
        }

        let col = (x * self.cols as f64 / self.logical_width).floor();
        let row = (y * self.rows as f64 / self.logical_height).floor();
        if col >= self.cols as f64 || row >= self.rows as f64 {
            return None;
        }

        Some((col as TermInt, row as TermInt))
    }

    /// Logical point at the center of a terminal cell.
    pub fn to_logical(&self, (col, row): Coords) -> Point {
        let x = (col as f64 + 0.5) * self.logical_width / self.cols as f64;
        let y = (row as f64 + 0.5) * self.logical_height / self.rows as f64;
        (x, y)
    }

    pub fn put(&mut self, (col, row): Coords, cell: Cell) {
        if col < self.cols && row < self.rows {
            self.cells[self.cols as usize * row as usize + col as usize] = cell;
        }
    }

    #[cfg(test)]
    pub fn get(&self, (col, row): Coords) -> Option<Cell> {
        if col < self.cols && row < self.rows {
            Some(self.cells[self.cols as usize * row as usize + col as usize])
        } else {
            None
        }
    }

    /// Fills every cell whose area overlaps the logical rect; at least the
    /// cell under its top-left corner.
    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, cell: Cell) {
        if self.cols == 0 || self.rows == 0 {
            return;
        }

        let col_w = self.logical_width / self.cols as f64;
        let row_h = self.logical_height / self.rows as f64;

        let first_col = (x / col_w).floor().max(0.0);
        let first_row = (y / row_h).floor().max(0.0);
        let last_col = ((x + w) / col_w).ceil().min(self.cols as f64).max(first_col + 1.0);
        let last_row = ((y + h) / row_h).ceil().min(self.rows as f64).max(first_row + 1.0);

        let mut row = first_row;
        while row < last_row {
            let mut col = first_col;
            while col < last_col {
                self.put((col as TermInt, row as TermInt), cell);
                col += 1.0;
            }
            row += 1.0;
        }
    }

    pub fn text(&mut self, pos: Point, text: &str, color: Color) {
        if let Some((col, row)) = self.to_cell(pos) {
            for (i, ch) in text.chars().enumerate() {
                self.put((col + i as TermInt, row), Cell::new(ch, color));
            }
        }
    }

    /// Draws a sprite with its top-left glyph at `pos`; spaces are transparent.
    pub fn sprite(&mut self, pos: Point, sprite: &Sprite, color: Color) {
        if let Some((col, row)) = self.to_cell(pos) {
            for (dy, line) in sprite.rows().iter().enumerate() {
                for (dx, ch) in line.chars().enumerate() {
                    if ch != ' ' {
                        self.put((col + dx as TermInt, row + dy as TermInt), Cell::new(ch, color));
                    }
                }
            }
        }
    }
}
