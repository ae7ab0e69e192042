use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// The four cardinal moves available to the agent. The declaration order is
/// significant: successors are generated, and ties are broken, in this order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    Deserialize,
    Serialize,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    /// `(row, column)` displacement of the move.
    pub fn offset(&self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// The two directions at right angles to this one, counter-clockwise
    /// first.
    pub fn perpendiculars(&self) -> [Direction; 2] {
        match self {
            Direction::Up => [Direction::Left, Direction::Right],
            Direction::Right => [Direction::Up, Direction::Down],
            Direction::Down => [Direction::Right, Direction::Left],
            Direction::Left => [Direction::Down, Direction::Up],
        }
    }

    pub fn arrow(&self) -> char {
        match self {
            Direction::Up => '^',
            Direction::Right => '>',
            Direction::Down => 'v',
            Direction::Left => '<',
        }
    }
}
