use crate::{TermInt, Coords};
use crate::canvas::{Canvas, Cell};
use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{Context, Result};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::event::{Event, KeyEvent, read, poll, EnableMouseCapture, DisableMouseCapture};
use crossterm::style::Color;

pub struct TermManager {
    width: TermInt,
    height: TermInt,
    stdout: Stdout,
    screen: Vec<Cell>,
    current_msg: Option<Message>,
}

struct Message {
    lines: Vec<String>,
    top_left: Coords,
    width: TermInt,
    height: TermInt,
}

impl TermManager {
    pub fn new() -> Result<Self> {
        let (width, height) = terminal::size().context("failed to read terminal size")?;
        let stdout = stdout();
        let screen = vec![Cell::BLANK; width as usize * height as usize];
        Ok(TermManager { width, height, stdout, screen, current_msg: None })
    }

    pub fn setup(&mut self) -> Result<()> {
        execute!(self.stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        terminal::enable_raw_mode().context("failed to enable raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking, EnableMouseCapture)
            .context("failed to prepare cursor and mouse")?;
        self.clear()
    }

    pub fn restore(&mut self) -> Result<()> {
        execute!(self.stdout, DisableMouseCapture, cursor::Show, cursor::EnableBlinking)
            .context("failed to restore cursor and mouse")?;
        terminal::disable_raw_mode().context("failed to disable raw mode")?;
        execute!(self.stdout, LeaveAlternateScreen).context("failed to leave alternate screen")?;
        Ok(())
    }

    pub fn read_key_blocking(&mut self) -> Result<KeyEvent> {
        loop {
            match read().context("failed to read terminal event")? {
                Event::Key(ev) => return Ok(ev),
                Event::Resize(w, h) => {
                    // The box is laid out for the old size, lay it out again
                    let msg = self.resize((w, h));
                    self.clear()?;
                    if let Some(msg) = msg {
                        self.draw_message(Message::layout(msg.lines, (w, h)))?;
                    }
                }
                _ => {}
            }
        }
    }

    /// Drains every pending event without blocking.
    pub fn read_events_queue(&mut self) -> Result<Vec<Event>> {
        let mut events = vec![];

        while poll(Duration::from_millis(0)).context("failed to poll terminal events")? {
            let ev = read().context("failed to read terminal event")?;
            if let Event::Resize(w, h) = ev {
                // Callers redraw their own message after a resize
                self.resize((w, h));
            }
            events.push(ev);
        }

        Ok(events)
    }

    pub fn get_terminal_size(&self) -> Coords {
        (self.width, self.height)
    }

    /// Writes the cells that differ from what is on screen.
    pub fn present(&mut self, canvas: &Canvas) -> Result<()> {
        if canvas.size() != (self.width, self.height) {
            return Ok(());
        }

        let mut color = None;
        for (i, cell) in canvas.cells().iter().enumerate() {
            if self.screen[i] == *cell {
                continue;
            }

            let x = (i % self.width as usize) as TermInt;
            let y = (i / self.width as usize) as TermInt;
            if color != Some(cell.color) {
                queue!(self.stdout, style::SetForegroundColor(cell.color))?;
                color = Some(cell.color);
            }
            queue!(self.stdout, cursor::MoveTo(x, y), style::Print(cell.ch))?;
            self.screen[i] = *cell;
        }

        queue!(self.stdout, style::ResetColor)?;
        self.flush()
    }

    pub fn show_message(&mut self, lines: &[&str]) -> Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let lines = lines.iter().map(|line| line.to_string()).collect();
        self.draw_message(Message::layout(lines, (self.width, self.height)))
    }

    pub fn hide_message(&mut self) -> Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };
        let top_left = msg.top_left();

        // Restore the content from the screen buffer
        for y_diff in 0..msg.height() {
            for x_diff in 0..msg.width() {
                let (x, y) = (top_left.0 + x_diff, top_left.1 + y_diff);
                if x >= self.width || y >= self.height {
                    continue;
                }
                let cell = self.screen[self.width as usize * y as usize + x as usize];
                queue!(self.stdout, style::SetForegroundColor(cell.color))?;
                self.print_at_no_save((x, y), cell.ch)?;
            }
        }

        queue!(self.stdout, style::ResetColor)?;
        self.flush()
    }

    pub fn clear(&mut self) -> Result<()> {
        execute!(self.stdout, terminal::Clear(ClearType::All)).context("failed to clear terminal")?;
        self.screen = vec![Cell::BLANK; self.width as usize * self.height as usize];
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stdout.flush().context("failed to flush terminal")
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    ///////////////////////////////////////////////////////////////////////////

    /// Returns the message that was on screen, it is gone after a resize.
    fn resize(&mut self, size: Coords) -> Option<Message> {
        self.width = size.0;
        self.height = size.1;
        // Forces a full repaint on the next present
        self.screen = vec![Cell::new('\0', Color::Reset); self.width as usize * self.height as usize];
        self.current_msg.take()
    }

    fn draw_message(&mut self, msg: Message) -> Result<()> {
        let top_left = msg.top_left();
        let (msg_width, msg_height) = (msg.width(), msg.height());

        queue!(self.stdout, style::SetForegroundColor(Color::White))?;

        // Print the top and bottom empty lines
        for y in [top_left.1, top_left.1 + msg_height - 1].iter() {
            for x_diff in 0..msg_width {
                self.print_at_no_save((top_left.0 + x_diff, *y), ' ')?;
            }
        }

        // Print the message lines
        for (i, line) in msg.lines.iter().enumerate() {
            let padded_line = format!("{line: ^width$}", line = line, width = msg_width as usize);
            let y = top_left.1 + i as TermInt + 1;
            for (x_diff, ch) in padded_line.chars().enumerate() {
                self.print_at_no_save((top_left.0 + x_diff as TermInt, y), ch)?;
            }
        }

        self.current_msg = Some(msg);
        self.flush()
    }

    fn print_at_no_save(&mut self, pos: Coords, ch: char) -> Result<()> {
        // To be used for printing messages, where we don't wanna overwrite our
        // local buffer to restore it when the message is hidden
        queue!(self.stdout, cursor::MoveTo(pos.0, pos.1), style::Print(ch))?;
        Ok(())
    }
}

impl Message {
    /// Box around `lines` with one blank row above and below, centered on screen.
    fn layout(lines: Vec<String>, screen: Coords) -> Self {
        let height = (lines.len() + 2) as TermInt;
        let width = (lines.iter().map(|x| x.chars().count()).max().unwrap_or(0) + 2) as TermInt;
        let center = (screen.0 / 2, screen.1 / 2);
        let top_left = (center.0.saturating_sub(width / 2), center.1.saturating_sub(height / 2));
        Message { lines, top_left, width, height }
    }

    pub fn width(&self) -> TermInt {
        self.width
    }

    pub fn height(&self) -> TermInt {
        self.height
    }

    pub fn top_left(&self) -> Coords {
        self.top_left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines() -> Vec<String> {
        vec!["Paused".to_string(), "Press Esc to resume".to_string()]
    }

    #[test]
    fn message_box_is_centered() {
        let msg = Message::layout(lines(), (80, 24));
        assert_eq!((msg.width(), msg.height()), (21, 4));
        assert_eq!(msg.top_left(), (30, 10));
    }

    #[test]
    fn relayout_after_resize_keeps_lines() {
        let msg = Message::layout(lines(), (80, 24));
        let msg = Message::layout(msg.lines, (120, 40));
        assert_eq!(msg.lines, lines());
        assert_eq!(msg.top_left(), (50, 18));
    }

    #[test]
    fn tiny_screen_pins_box_to_corner() {
        let msg = Message::layout(lines(), (10, 2));
        assert_eq!(msg.top_left(), (0, 0));
    }
}
