use anyhow::ensure;

use crate::snake::Direction;

/// Top-left corner of a grid cell, in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

/// Dimensions of the toroidal playing field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cell_size: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32, cell_size: i32) -> anyhow::Result<Self> {
        ensure!(cell_size > 0, "cell size must be positive, got {}", cell_size);
        ensure!(width > 0 && height > 0, "field must not be empty, got {}x{}", width, height);
        ensure!(
            width % cell_size == 0 && height % cell_size == 0,
            "field {}x{} is not a whole number of {}px cells", width, height, cell_size
        );

        Ok(Grid { width, height, cell_size })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn cell_size(&self) -> i32 {
        self.cell_size
    }

    pub fn columns(&self) -> i32 {
        self.width / self.cell_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    pub fn cell_count(&self) -> usize {
        (self.columns() * self.rows()) as usize
    }

    /// Grid-aligned cell at the center of the field.
    pub fn start_position(&self) -> Position {
        Position::new(
            self.columns() / 2 * self.cell_size,
            self.rows() / 2 * self.cell_size,
        )
    }

    pub fn wrap(&self, x: i32, y: i32) -> Position {
        Position::new(x.rem_euclid(self.width), y.rem_euclid(self.height))
    }

    /// The neighbouring cell in `direction`, wrapping around the field edges.
    pub fn step(&self, pos: Position, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        self.wrap(pos.x + dx * self.cell_size, pos.y + dy * self.cell_size)
    }

    /// Cell containing an arbitrary pixel coordinate.
    pub fn cell_at(&self, px: i32, py: i32) -> Position {
        let p = self.wrap(px, py);
        Position::new(
            p.x - p.x % self.cell_size,
            p.y - p.y % self.cell_size,
        )
    }

    /// Column and row of a grid-aligned position.
    pub fn cell_coords(&self, pos: Position) -> (i32, i32) {
        (pos.x / self.cell_size, pos.y / self.cell_size)
    }

    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let (columns, rows, size) = (self.columns(), self.rows(), self.cell_size);
        (0..rows).flat_map(move |row| {
            (0..columns).map(move |col| Position::new(col * size, row * size))
        })
    }
}

#[cfg(test)]
impl Default for Grid {
    fn default() -> Self {
        use crate::consts::{CELL_SIZE, FIELD_HEIGHT, FIELD_WIDTH};
        Grid::new(FIELD_WIDTH, FIELD_HEIGHT, CELL_SIZE).unwrap()
    }
}
