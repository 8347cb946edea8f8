use serde::{Deserialize, Serialize};

use super::Direction;

/// Addressing for a padded board: a `width x height` playing area surrounded by
/// one ring of cells. Coordinates are padded, so the playing area spans rows
/// `1..=height` and columns `1..=width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn stride(&self) -> usize {
        self.width + 2
    }

    pub fn padded_height(&self) -> usize {
        self.height + 2
    }

    pub fn len(&self) -> usize {
        self.stride() * self.padded_height()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.stride() + col
    }

    pub fn row_of(&self, id: usize) -> usize {
        id / self.stride()
    }

    pub fn col_of(&self, id: usize) -> usize {
        id % self.stride()
    }

    pub fn coords(&self, id: usize) -> (usize, usize) {
        (self.row_of(id), self.col_of(id))
    }

    pub fn is_border(&self, id: usize) -> bool {
        let (row, col) = self.coords(id);
        row == 0 || col == 0 || row == self.padded_height() - 1 || col == self.stride() - 1
    }

    /// The neighbouring cell in `direction`, or `None` past the outer ring.
    pub fn step(&self, id: usize, direction: Direction) -> Option<usize> {
        let (row, col) = self.coords(id);
        let (dr, dc) = direction.delta();
        let row = row.checked_add_signed(dr)?;
        let col = col.checked_add_signed(dc)?;
        if row >= self.padded_height() || col >= self.stride() {
            return None;
        }
        Some(self.index(row, col))
    }

    pub fn neighbors(&self, id: usize) -> impl Iterator<Item = usize> {
        let grid = *self;
        Direction::all()
            .into_iter()
            .filter_map(move |direction| grid.step(id, direction))
    }

    /// Ids of the playing area in row-major order.
    pub fn interior_cells(&self) -> impl Iterator<Item = usize> {
        let grid = *self;
        (1..=grid.height).flat_map(move |row| (1..=grid.width).map(move |col| grid.index(row, col)))
    }
}
