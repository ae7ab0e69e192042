use crate::grid::{GridModel, Position};
use crate::search::graph_search::{cell_count, graph_search};
use crate::search::{LifoFrontier, SearchEngine, SearchResult, SearchStatistics};
use tracing::debug;

/// Iterative deepening search: depth-limited search with a bound of 0, 1,
/// 2, ... until the bounded search stops reporting a cutoff. Statistics
/// accumulate over all iterations.
#[derive(Debug, Clone)]
pub struct IterativeDeepening {
    /// Largest bound to try. Defaults to the number of cells in the city.
    max_depth: Option<usize>,
}

impl IterativeDeepening {
    pub fn new(max_depth: Option<usize>) -> Self {
        Self { max_depth }
    }
}

impl SearchEngine for IterativeDeepening {
    fn search(
        &mut self,
        grid: &GridModel,
        start: Position,
        target: Position,
    ) -> (SearchResult, SearchStatistics) {
        let mut statistics = SearchStatistics::new();
        let max_depth = self.max_depth.unwrap_or_else(|| cell_count(grid));

        let mut result = SearchResult::Unsolvable;
        for depth_limit in 0..=max_depth {
            let mut frontier = LifoFrontier::new();
            result = graph_search(
                grid,
                start,
                target,
                &mut frontier,
                Some(depth_limit),
                &mut statistics,
            );
            if result != SearchResult::DepthLimitReached {
                break;
            }
            debug!(depth_limit, "no solution within depth limit, deepening");
        }

        // Running out of bounds to try is the end of the search, not a cutoff
        // the caller could act on.
        if result == SearchResult::DepthLimitReached {
            result = SearchResult::Unsolvable;
        }
        statistics.finalise_search(&result);
        (result, statistics)
    }
}
