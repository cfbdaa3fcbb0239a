use crossterm::style::Color;

use crate::consts::{FOOD_COLOR, SNAKE_COLOR};
use crate::food::Food;
use crate::grid::Position;
use crate::snake::Snake;

/// A surface made of grid cells.
pub trait Canvas {
    /// Fills one cell with `color`, outlined in the border color.
    fn draw_cell(&mut self, pos: Position, color: Color) -> anyhow::Result<()>;

    /// Paints one cell with the background color.
    fn erase_cell(&mut self, pos: Position) -> anyhow::Result<()>;

    /// Paints the whole field with the background color.
    fn clear(&mut self) -> anyhow::Result<()>;

    /// Makes everything drawn so far visible.
    fn present(&mut self) -> anyhow::Result<()>;
}

/// Something that knows which cells to touch to show its latest state.
pub trait Drawable {
    fn draw(&self, canvas: &mut dyn Canvas) -> anyhow::Result<()>;
}

impl Drawable for Snake {
    // Only the cells that changed in the last step: the vacated tail and the new head
    fn draw(&self, canvas: &mut dyn Canvas) -> anyhow::Result<()> {
        if let Some(tail) = self.last_removed_tail() {
            canvas.erase_cell(tail)?;
        }
        canvas.draw_cell(self.head(), SNAKE_COLOR)
    }
}

impl Drawable for Food {
    fn draw(&self, canvas: &mut dyn Canvas) -> anyhow::Result<()> {
        canvas.draw_cell(self.position(), FOOD_COLOR)
    }
}
