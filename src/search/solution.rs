//! A solution is the sequence of actions that takes the agent from its
//! departure to a trapped person, together with what that sequence costs.

use crate::grid::{Direction, GridModel, Position};
use itertools::Itertools;
use std::fmt::{self, Display};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    actions: Vec<Direction>,
    /// Every position visited, start and goal included, so always one longer
    /// than `actions`.
    positions: Vec<Position>,
    cost: u32,
}

impl Solution {
    pub fn new(actions: Vec<Direction>, positions: Vec<Position>, cost: u32) -> Self {
        debug_assert_eq!(actions.len() + 1, positions.len());
        Self {
            actions,
            positions,
            cost,
        }
    }

    pub fn actions(&self) -> &[Direction] {
        &self.actions
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Number of actions in the solution.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Recompute the cost of the path from the step costs of the grid.
    pub fn path_cost(&self, grid: &GridModel) -> u32 {
        self.positions
            .iter()
            .skip(1)
            .map(|position| grid.step_cost(position))
            .sum()
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.actions.iter().join(", "))
    }
}
