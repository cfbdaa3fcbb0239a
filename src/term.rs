use std::{io::{Stdout, Write, stdout}, time::Duration};

use anyhow::{bail, Context};
use crossterm::{cursor, execute, queue, style, terminal};
use crossterm::style::Color;
use crossterm::terminal::{ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use crossterm::event::{Event, KeyEvent, read, poll};
use log::{debug, error};

use crate::consts::{BACKGROUND_COLOR, BORDER_COLOR, CELL_GLYPH, EMPTY_GLYPH, WINDOW_TITLE};
use crate::grid::{Grid, Position};
use crate::render::Canvas;
use crate::TermInt;

/// Terminal columns taken by one grid cell
const CELL_WIDTH: TermInt = 2;

pub struct TermManager {
    grid: Grid,
    stdout: Stdout,
    origin: (TermInt, TermInt),
    framed: bool,
}

impl TermManager {
    /// Lays the field out in the middle of the current terminal.
    pub fn new(grid: Grid) -> anyhow::Result<Self> {
        let (width, height) = terminal::size().context("reading terminal size")?;
        let field_w = grid.columns() as TermInt * CELL_WIDTH;
        let field_h = grid.rows() as TermInt;

        if width < field_w || height < field_h {
            bail!(
                "terminal is {}x{} but the field needs at least {}x{}",
                width, height, field_w, field_h
            );
        }

        let framed = width >= field_w + 2 && height >= field_h + 2;
        let origin = ((width - field_w) / 2, (height - field_h) / 2);
        debug!("Terminal {}x{}, field at {:?}, framed: {}", width, height, origin, framed);

        Ok(TermManager { grid, stdout: stdout(), origin, framed })
    }

    pub fn setup(&mut self) -> anyhow::Result<()> {
        execute!(self.stdout, EnterAlternateScreen, SetTitle(WINDOW_TITLE))
            .context("entering alternate screen")?;
        terminal::enable_raw_mode().context("enabling raw mode")?;
        execute!(self.stdout, cursor::Hide, cursor::DisableBlinking)
            .context("hiding cursor")?;

        execute!(self.stdout, terminal::Clear(ClearType::All)).context("clearing terminal")?;
        if self.framed {
            self.draw_frame()?;
        }
        self.flush()
    }

    /// Undoes `setup`. Every step is attempted, failures are only logged.
    pub fn restore(&mut self) {
        if let Err(err) = terminal::disable_raw_mode() {
            error!("Failed to disable raw mode: {}", err);
        }
        if let Err(err) = execute!(self.stdout, style::ResetColor, cursor::Show, cursor::EnableBlinking) {
            error!("Failed to restore cursor: {}", err);
        }
        if let Err(err) = execute!(self.stdout, LeaveAlternateScreen) {
            error!("Failed to leave alternate screen: {}", err);
        }
    }

    /// Drains every key press queued since the last call, without blocking.
    pub fn read_key_events_queue(&self) -> anyhow::Result<Vec<KeyEvent>> {
        let mut events = vec![];

        while poll(Duration::from_millis(0)).context("polling terminal events")? {
            match read().context("reading terminal event")? {
                Event::Key(ev) => events.push(ev),
                other => debug!("Ignoring event {:?}", other),
            }
        }

        Ok(events)
    }

    pub fn flush(&mut self) -> anyhow::Result<()> {
        self.stdout.flush().context("flushing terminal")
    }

    ///////////////////////////////////////////////////////////////////////////

    fn draw_frame(&mut self) -> anyhow::Result<()> {
        let width = self.grid.columns() as TermInt * CELL_WIDTH + 2;
        let height = self.grid.rows() as TermInt + 2;
        let (left, top) = (self.origin.0 - 1, self.origin.1 - 1);
        let (right, bottom) = (left + width - 1, top + height - 1);

        queue!(self.stdout, style::SetForegroundColor(BORDER_COLOR), style::SetBackgroundColor(BACKGROUND_COLOR))?;

        for x in left..=right {
            let ch = if x == left || x == right {'+'} else {'-'};
            queue!(self.stdout, cursor::MoveTo(x, top), style::Print(ch))?;
            queue!(self.stdout, cursor::MoveTo(x, bottom), style::Print(ch))?;
        }

        for y in top + 1..bottom {
            queue!(self.stdout, cursor::MoveTo(left, y), style::Print('|'))?;
            queue!(self.stdout, cursor::MoveTo(right, y), style::Print('|'))?;
        }

        queue!(self.stdout, style::ResetColor)?;
        Ok(())
    }

    fn to_screen(&self, pos: Position) -> (TermInt, TermInt) {
        let (col, row) = self.grid.cell_coords(self.grid.cell_at(pos.x, pos.y));
        (self.origin.0 + col as TermInt * CELL_WIDTH, self.origin.1 + row as TermInt)
    }

    fn print_cell(&mut self, pos: Position, glyph: &str, fg: Color, bg: Color) -> anyhow::Result<()> {
        let (x, y) = self.to_screen(pos);
        queue!(
            self.stdout,
            cursor::MoveTo(x, y),
            style::SetForegroundColor(fg),
            style::SetBackgroundColor(bg),
            style::Print(glyph),
            style::ResetColor
        )?;
        Ok(())
    }
}

impl Canvas for TermManager {
    fn draw_cell(&mut self, pos: Position, color: Color) -> anyhow::Result<()> {
        self.print_cell(pos, CELL_GLYPH, BORDER_COLOR, color)
    }

    fn erase_cell(&mut self, pos: Position) -> anyhow::Result<()> {
        self.print_cell(pos, EMPTY_GLYPH, BACKGROUND_COLOR, BACKGROUND_COLOR)
    }

    fn clear(&mut self) -> anyhow::Result<()> {
        let cells: Vec<Position> = self.grid.cells().collect();
        for pos in cells {
            self.erase_cell(pos)?;
        }
        Ok(())
    }

    fn present(&mut self) -> anyhow::Result<()> {
        self.flush()
    }
}
