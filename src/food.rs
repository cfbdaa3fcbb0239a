use std::collections::HashSet;

use rand::seq::IteratorRandom;
use rand::Rng;

use crate::grid::{Grid, Position};

pub struct Food {
    position: Position,
}

impl Food {
    pub fn new(position: Position) -> Self {
        Food { position }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Moves the food to a random cell outside `excluded`.
    ///
    /// The pick is uniform over the free cells of the grid, so it always
    /// terminates. Returns `None`, leaving the food where it was, when no cell
    /// is free.
    pub fn respawn<R: Rng>(&mut self, grid: &Grid, excluded: &[Position], rng: &mut R) -> Option<Position> {
        let taken: HashSet<&Position> = excluded.iter().collect();
        let choice = grid.cells().filter(|pos| !taken.contains(pos)).choose(rng)?;

        self.position = choice;
        Some(choice)
    }

    #[cfg(test)]
    pub fn place(&mut self, position: Position) {
        self.position = position;
    }
}
