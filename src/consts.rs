//! Fixed settings of the game. There is no config file or command line.

use std::time::Duration;

use crossterm::style::Color;

use crate::snake::Direction;

/// Field width in pixels
pub const FIELD_WIDTH: i32 = 640;

/// Field height in pixels
pub const FIELD_HEIGHT: i32 = 480;

/// Side of a grid cell in pixels
pub const CELL_SIZE: i32 = 20;

/// Time between two movements of the snake (10 ticks per second)
pub const TICK_PERIOD: Duration = Duration::from_millis(100);

/// Direction the snake starts moving in after every reset
pub const INITIAL_DIRECTION: Direction = Direction::Left;

pub const WINDOW_TITLE: &str = "Snake";
pub const LOG_FILE: &str = "snake.log";

pub const BACKGROUND_COLOR: Color = Color::Rgb { r: 0, g: 0, b: 0 };
pub const BORDER_COLOR: Color = Color::Rgb { r: 93, g: 216, b: 228 };
pub const FOOD_COLOR: Color = Color::Rgb { r: 255, g: 0, b: 0 };
pub const SNAKE_COLOR: Color = Color::Rgb { r: 0, g: 255, b: 0 };

/// Glyph of an occupied cell; each grid cell spans two terminal columns
pub const CELL_GLYPH: &str = "[]";
pub const EMPTY_GLYPH: &str = "  ";
