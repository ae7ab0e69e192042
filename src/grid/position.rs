use crate::grid::Direction;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A cell of the city, addressed by row and column. Positions are not bounded
/// on their own, it is up to the [`crate::grid::GridModel`] to decide whether a
/// position is part of the city.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(from = "(i32, i32)", into = "(i32, i32)")]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// The position reached by moving one cell in `direction`. The result may
    /// lie outside the city.
    pub fn neighbour(&self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.offset();
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    pub fn manhattan_distance(&self, other: &Position) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

impl From<Position> for (i32, i32) {
    fn from(position: Position) -> Self {
        (position.row, position.col)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
