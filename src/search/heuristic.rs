use crate::grid::Position;
use ordered_float::OrderedFloat;
use std::fmt::Debug;

pub type HeuristicValue = OrderedFloat<f64>;

pub trait Heuristic: Debug {
    /// Estimate the cost of reaching `target` from `position`.
    fn evaluate(&self, position: &Position, target: &Position) -> HeuristicValue;
}

/// Manhattan distance to the target.
///
/// The estimate ignores the hazard surcharge, so it is loose on cities with
/// hazards. It never exceeds the true remaining cost since every step costs
/// at least one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManhattanDistance;

impl Heuristic for ManhattanDistance {
    fn evaluate(&self, position: &Position, target: &Position) -> HeuristicValue {
        OrderedFloat(position.manhattan_distance(target) as f64)
    }
}
