use crate::grid::Position;
use itertools::iproduct;
use std::collections::{HashMap, HashSet};

/// Cost of stepping onto an ordinary cell.
pub const NORMAL_STEP_COST: u32 = 1;
/// Cost of stepping onto a hazard cell.
pub const HAZARD_STEP_COST: u32 = 5;

/// The immutable layout of a city: its dimensions and which cells are
/// blocked, hazardous, fatal or hold a trapped person.
///
/// Blocked cells are impassable. Hazard cells can be walked through but are
/// penalised. Fatal hazards and targets are terminal in the MDP formulation,
/// each carrying a fixed reward.
#[derive(Debug, Clone)]
pub struct GridModel {
    rows: i32,
    columns: i32,
    blocked: HashSet<Position>,
    hazards: HashSet<Position>,
    fatal_dangers: HashMap<Position, f64>,
    targets: HashMap<Position, f64>,
}

impl GridModel {
    /// An empty city of the given size, with no blocked cells, hazards or
    /// targets.
    pub fn new(rows: i32, columns: i32) -> Self {
        Self {
            rows,
            columns,
            blocked: HashSet::new(),
            hazards: HashSet::new(),
            fatal_dangers: HashMap::new(),
            targets: HashMap::new(),
        }
    }

    pub fn with_blocked(mut self, blocked: impl IntoIterator<Item = Position>) -> Self {
        self.blocked.extend(blocked);
        self
    }

    pub fn with_hazards(mut self, hazards: impl IntoIterator<Item = Position>) -> Self {
        self.hazards.extend(hazards);
        self
    }

    pub fn with_fatal_dangers(
        mut self,
        fatal_dangers: impl IntoIterator<Item = (Position, f64)>,
    ) -> Self {
        self.fatal_dangers.extend(fatal_dangers);
        self
    }

    pub fn with_targets(mut self, targets: impl IntoIterator<Item = (Position, f64)>) -> Self {
        self.targets.extend(targets);
        self
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn columns(&self) -> i32 {
        self.columns
    }

    pub fn in_bounds(&self, position: &Position) -> bool {
        (0..self.rows).contains(&position.row) && (0..self.columns).contains(&position.col)
    }

    pub fn is_blocked(&self, position: &Position) -> bool {
        self.blocked.contains(position)
    }

    /// A position is valid if it lies in the city and is not blocked.
    pub fn valid(&self, position: &Position) -> bool {
        self.in_bounds(position) && !self.is_blocked(position)
    }

    pub fn is_hazard(&self, position: &Position) -> bool {
        self.hazards.contains(position)
    }

    pub fn is_target(&self, position: &Position) -> bool {
        self.targets.contains_key(position)
    }

    pub fn is_fatal(&self, position: &Position) -> bool {
        self.fatal_dangers.contains_key(position)
    }

    /// Targets and fatal hazards both end an episode.
    pub fn is_terminal(&self, position: &Position) -> bool {
        self.is_target(position) || self.is_fatal(position)
    }

    pub fn target_reward(&self, position: &Position) -> Option<f64> {
        self.targets.get(position).copied()
    }

    pub fn fatal_reward(&self, position: &Position) -> Option<f64> {
        self.fatal_dangers.get(position).copied()
    }

    /// The reward attached to a terminal position, if it is one. Targets take
    /// precedence over fatal hazards.
    pub fn terminal_reward(&self, position: &Position) -> Option<f64> {
        self.target_reward(position)
            .or_else(|| self.fatal_reward(position))
    }

    /// Cost of an action, which only depends on the cell it moves onto.
    pub fn step_cost(&self, destination: &Position) -> u32 {
        if self.is_hazard(destination) {
            HAZARD_STEP_COST
        } else {
            NORMAL_STEP_COST
        }
    }

    /// Target positions in row-major order.
    pub fn targets(&self) -> Vec<Position> {
        let mut targets: Vec<Position> = self.targets.keys().copied().collect();
        targets.sort();
        targets
    }

    /// All valid positions in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        iproduct!(0..self.rows, 0..self.columns)
            .map(|(row, col)| Position::new(row, col))
            .filter(|position| !self.is_blocked(position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn city() -> GridModel {
        GridModel::new(3, 4)
            .with_blocked([Position::new(1, 1)])
            .with_hazards([Position::new(2, 2)])
            .with_fatal_dangers([(Position::new(1, 3), -1.)])
            .with_targets([(Position::new(0, 3), 1.)])
    }

    #[test]
    fn validity_excludes_blocked_and_out_of_bounds() {
        let grid = city();
        for row in -1..=3 {
            for col in -1..=4 {
                let position = Position::new(row, col);
                let expected = (0..3).contains(&row)
                    && (0..4).contains(&col)
                    && position != Position::new(1, 1);
                assert_eq!(grid.valid(&position), expected, "{}", position);
            }
        }
    }

    #[test]
    fn classification_queries() {
        let grid = city();
        assert!(grid.is_hazard(&Position::new(2, 2)));
        assert!(grid.valid(&Position::new(2, 2)));
        assert!(grid.is_target(&Position::new(0, 3)));
        assert!(grid.is_fatal(&Position::new(1, 3)));
        assert!(grid.is_terminal(&Position::new(1, 3)));
        assert!(!grid.is_terminal(&Position::new(0, 0)));
        assert_eq!(grid.terminal_reward(&Position::new(0, 3)), Some(1.));
        assert_eq!(grid.terminal_reward(&Position::new(1, 3)), Some(-1.));
        assert_eq!(grid.terminal_reward(&Position::new(0, 0)), None);
    }

    #[test]
    fn step_cost_depends_on_destination() {
        let grid = city();
        assert_eq!(grid.step_cost(&Position::new(2, 2)), HAZARD_STEP_COST);
        assert_eq!(grid.step_cost(&Position::new(0, 0)), NORMAL_STEP_COST);
    }

    #[test]
    fn positions_skip_blocked_cells() {
        let grid = city();
        let positions: Vec<Position> = grid.positions().collect();
        assert_eq!(positions.len(), 11);
        assert!(!positions.contains(&Position::new(1, 1)));
        assert_eq!(positions[0], Position::new(0, 0));
        assert_eq!(positions[10], Position::new(2, 3));
    }
}
