//! The generic graph search loop, shared by every engine. The frontier
//! decides the expansion order, the loop does the rest.

use crate::grid::{Direction, GridModel, Position};
use crate::search::{
    BestFirstFrontier, FifoFrontier, Frontier, LifoFrontier, ManhattanDistance, Priority,
    SearchEngine, SearchResult, SearchSpace, SearchStatistics,
};
use std::collections::HashMap;
use strum::IntoEnumIterator;
use tracing::debug;

/// Run one graph search from `start` to `target`.
///
/// Positions enter the closed set when their node is extracted, not when it
/// is inserted, so the frontier may hold several nodes for one position.
/// Every extracted node counts as expanded, including those skipped because
/// their position is already closed. With a depth bound, nodes at the bound
/// are not expanded further, and a closed position is reopened when reached
/// again at a strictly smaller depth.
pub fn graph_search(
    grid: &GridModel,
    start: Position,
    target: Position,
    frontier: &mut dyn Frontier,
    depth_limit: Option<usize>,
    statistics: &mut SearchStatistics,
) -> SearchResult {
    let mut search_space = SearchSpace::new(start);
    let mut closed: HashMap<Position, usize> = HashMap::new();
    let mut cutoff = false;

    frontier.insert(search_space.get_root_node());

    while let Some(node_id) = frontier.extract() {
        statistics.increment_expanded_nodes();
        let node = search_space.get_node(node_id);
        let position = node.get_position();
        let depth = node.get_depth();

        if position == target {
            return SearchResult::Success(search_space.extract_solution(node_id));
        }

        let already_closed = match closed.get(&position) {
            Some(&closed_depth) => depth_limit.is_none() || closed_depth <= depth,
            None => false,
        };
        if already_closed {
            statistics.increment_skipped_duplicates();
            continue;
        }
        closed.insert(position, depth);
        statistics.increment_closed_nodes();

        if depth_limit.is_some_and(|limit| depth >= limit) {
            cutoff = true;
            statistics.increment_cutoff_nodes();
            continue;
        }

        for direction in Direction::iter() {
            let successor = position.neighbour(direction);
            if !grid.valid(&successor) {
                continue;
            }
            let child_id = search_space.insert_child(
                node_id,
                direction,
                successor,
                grid.step_cost(&successor),
            );
            statistics.increment_generated_nodes(1);
            frontier.insert(search_space.get_node(child_id));
        }
    }

    debug!(
        nodes = search_space.len(),
        cutoff, "frontier exhausted without reaching target"
    );
    if cutoff {
        SearchResult::DepthLimitReached
    } else {
        SearchResult::Unsolvable
    }
}

/// Frontier discipline of a [`FrontierSearch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontierStrategy {
    BreadthFirst,
    DepthFirst,
    /// Depth-first with a depth bound. Without an explicit bound the number of
    /// cells in the city is used, which no simple path can exceed.
    DepthLimited(Option<usize>),
    GreedyBestFirst,
    AStar,
}

impl FrontierStrategy {
    pub fn create_frontier(&self, target: Position) -> Box<dyn Frontier> {
        match self {
            FrontierStrategy::BreadthFirst => Box::new(FifoFrontier::new()),
            FrontierStrategy::DepthFirst | FrontierStrategy::DepthLimited(_) => {
                Box::new(LifoFrontier::new())
            }
            FrontierStrategy::GreedyBestFirst => Box::new(BestFirstFrontier::new(
                target,
                Priority::Heuristic,
                Box::new(ManhattanDistance),
            )),
            FrontierStrategy::AStar => Box::new(BestFirstFrontier::new(
                target,
                Priority::CostPlusHeuristic,
                Box::new(ManhattanDistance),
            )),
        }
    }

    pub fn depth_limit(&self, grid: &GridModel) -> Option<usize> {
        match self {
            FrontierStrategy::DepthLimited(limit) => {
                Some(limit.unwrap_or_else(|| cell_count(grid)))
            }
            _ => None,
        }
    }
}

pub(crate) fn cell_count(grid: &GridModel) -> usize {
    (grid.rows().max(0) as usize) * (grid.columns().max(0) as usize)
}

/// A search engine that runs [`graph_search`] with a fresh frontier of the
/// configured discipline for every mission.
#[derive(Debug, Clone)]
pub struct FrontierSearch {
    strategy: FrontierStrategy,
}

impl FrontierSearch {
    pub fn new(strategy: FrontierStrategy) -> Self {
        Self { strategy }
    }
}

impl SearchEngine for FrontierSearch {
    fn search(
        &mut self,
        grid: &GridModel,
        start: Position,
        target: Position,
    ) -> (SearchResult, SearchStatistics) {
        let mut statistics = SearchStatistics::new();
        let mut frontier = self.strategy.create_frontier(target);
        let result = graph_search(
            grid,
            start,
            target,
            frontier.as_mut(),
            self.strategy.depth_limit(grid),
            &mut statistics,
        );
        statistics.finalise_search(&result);
        (result, statistics)
    }
}
