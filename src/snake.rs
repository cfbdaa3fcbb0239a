use std::collections::VecDeque;

use log::debug;

use crate::consts::INITIAL_DIRECTION;
use crate::grid::{Grid, Position};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    /// Unit vector in screen coordinates (y grows downwards).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }
}

pub struct Snake {
    body: VecDeque<Position>, // Head first
    direction: Option<Direction>,
    pending_direction: Option<Direction>,
    target_length: usize,
    last_removed_tail: Option<Position>,
    start: Position,
}

impl Snake {
    pub fn new(start: Position) -> Self {
        let mut snake = Snake {
            body: VecDeque::new(),
            direction: None,
            pending_direction: None,
            target_length: 1,
            last_removed_tail: None,
            start,
        };
        snake.reset();
        snake
    }

    /// Back to a single cell at the start position, waiting to move in the initial direction.
    pub fn reset(&mut self) {
        self.body.clear();
        self.body.push_back(self.start);
        self.direction = None;
        self.pending_direction = Some(INITIAL_DIRECTION);
        self.target_length = 1;
        self.last_removed_tail = None;
    }

    pub fn set_pending_direction(&mut self, new_direction: Direction) {
        match self.direction {
            Some(current) if current.opposite() == new_direction => {
                debug!("Ignoring reversal from {:?} to {:?}", current, new_direction);
            },
            _ => self.pending_direction = Some(new_direction),
        }
    }

    pub fn commit_direction(&mut self) {
        if let Some(dir) = self.pending_direction.take() {
            self.direction = Some(dir);
        }
    }

    pub fn advance(&mut self, grid: &Grid) {
        self.last_removed_tail = None;

        let direction = match self.direction {
            Some(dir) => dir,
            None => return,
        };

        let new_head = grid.step(self.head(), direction);
        self.body.push_front(new_head);

        if self.body.len() > self.target_length {
            self.last_removed_tail = self.body.pop_back();
        }
    }

    pub fn grow(&mut self) {
        self.target_length += 1;
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn body_overlaps_head(&self) -> bool {
        let head = self.head();
        self.body.iter().skip(1).any(|pos| *pos == head)
    }

    pub fn positions(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn target_length(&self) -> usize {
        self.target_length
    }

    #[cfg(test)]
    pub fn direction(&self) -> Option<Direction> {
        self.direction
    }

    #[cfg(test)]
    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    pub fn last_removed_tail(&self) -> Option<Position> {
        self.last_removed_tail
    }

    /// A snake already in motion, with the head first in `body`.
    #[cfg(test)]
    pub fn with_body(start: Position, body: &[Position], direction: Direction) -> Self {
        Snake {
            body: body.iter().copied().collect(),
            direction: Some(direction),
            pending_direction: None,
            target_length: body.len(),
            last_removed_tail: None,
            start,
        }
    }
}
