use crate::grid::{Direction, GridModel, Position};
use std::collections::BTreeMap;
use std::fmt::{self, Display};

/// The action an agent prefers in each non-terminal state. Agents build a
/// fresh policy on every improvement rather than editing the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Policy {
    actions: BTreeMap<Position, Direction>,
}

impl Policy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, state: Position, action: Direction) {
        self.actions.insert(state, action);
    }

    pub fn get(&self, state: &Position) -> Option<Direction> {
        self.actions.get(state).copied()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// State-action pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, Direction)> + '_ {
        self.actions.iter().map(|(&state, &action)| (state, action))
    }

    /// Draw the policy as a map of the city, one character per cell:
    /// arrows for the chosen actions, `#` for blocked cells, `T` for targets,
    /// `X` for fatal hazards and `.` for cells without an action.
    pub fn render(&self, grid: &GridModel) -> String {
        let mut map = String::new();
        for row in 0..grid.rows() {
            let line: String = (0..grid.columns())
                .map(|col| {
                    let position = Position::new(row, col);
                    if grid.is_blocked(&position) {
                        '#'
                    } else if grid.is_target(&position) {
                        'T'
                    } else if grid.is_fatal(&position) {
                        'X'
                    } else {
                        self.get(&position).map_or('.', |action| action.arrow())
                    }
                })
                .collect();
            map.push_str(&line);
            map.push('\n');
        }
        map
    }
}

impl FromIterator<(Position, Direction)> for Policy {
    fn from_iter<I: IntoIterator<Item = (Position, Direction)>>(iter: I) -> Self {
        Self {
            actions: iter.into_iter().collect(),
        }
    }
}

impl Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (state, action) in self.iter() {
            writeln!(f, "\"{}\": \"{}\"", state, action)?;
        }
        Ok(())
    }
}
