//! A mission is the rescue of one trapped person: a search from the
//! departure to their position. Every trapped person gets an independent
//! search from the same departure.

use crate::grid::{GridModel, Position};
use crate::search::{AggregateStatistics, SearchEngine, SearchResult, SearchStatistics};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct MissionReport {
    pub target: Position,
    pub result: SearchResult,
    pub statistics: SearchStatistics,
}

pub fn run_mission(
    grid: &GridModel,
    start: Position,
    target: Position,
    engine: &mut dyn SearchEngine,
) -> MissionReport {
    debug!(start = %start, target = %target, "starting mission");
    let (result, statistics) = engine.search(grid, start, target);
    match &result {
        SearchResult::Success(solution) => info!(
            target = %target,
            solution_length = solution.len(),
            solution_cost = solution.cost(),
            "target rescued"
        ),
        _ => info!(target = %target, "target could not be reached"),
    }
    MissionReport {
        target,
        result,
        statistics,
    }
}

/// Run one mission per target of the grid, in row-major order, folding each
/// completed mission into `aggregate`.
pub fn run_missions(
    grid: &GridModel,
    start: Position,
    engine: &mut dyn SearchEngine,
    aggregate: &mut AggregateStatistics,
) -> Vec<MissionReport> {
    grid.targets()
        .into_iter()
        .map(|target| {
            let report = run_mission(grid, start, target, engine);
            aggregate.fold(target, &report.statistics);
            report
        })
        .collect()
}
