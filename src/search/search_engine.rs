use crate::grid::{GridModel, Position};
use crate::search::{
    FrontierSearch, FrontierStrategy, IterativeDeepening, SearchStatistics, Solution,
};
use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
    /// The target was reached
    Success(Solution),
    /// A depth bound pruned part of the space before the target was found,
    /// so a deeper search might still succeed
    DepthLimitReached,
    /// The target cannot be reached from the start
    Unsolvable,
}

impl SearchResult {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SearchResult::Success(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SearchResult::Success(_))
    }
}

pub trait SearchEngine: Debug {
    /// Search for a path from `start` to `target`. Every call is independent:
    /// no frontier or closed set survives from one call to the next.
    fn search(
        &mut self,
        grid: &GridModel,
        start: Position,
        target: Position,
    ) -> (SearchResult, SearchStatistics);
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEngineName {
    #[value(name = "bfs", help = "Breadth-first search.")]
    BreadthFirst,
    #[value(name = "dfs", help = "Depth-first search.")]
    DepthFirst,
    #[value(
        name = "dls",
        help = "Depth-limited search, bounded by the depth limit option."
    )]
    DepthLimited,
    #[value(
        name = "ids",
        help = "Iterative deepening search, growing the depth bound from zero."
    )]
    IterativeDeepening,
    #[value(name = "greedy", help = "Greedy best-first search on Manhattan distance.")]
    GreedyBestFirst,
    #[value(name = "astar", help = "A* search on Manhattan distance.")]
    AStar,
}

impl SearchEngineName {
    pub const ALL: [SearchEngineName; 6] = [
        SearchEngineName::BreadthFirst,
        SearchEngineName::DepthFirst,
        SearchEngineName::DepthLimited,
        SearchEngineName::IterativeDeepening,
        SearchEngineName::GreedyBestFirst,
        SearchEngineName::AStar,
    ];

    /// Build the engine. `depth_limit` bounds depth-limited search and caps
    /// iterative deepening; other engines ignore it.
    pub fn create(&self, depth_limit: Option<usize>) -> Box<dyn SearchEngine> {
        match self {
            SearchEngineName::BreadthFirst => {
                Box::new(FrontierSearch::new(FrontierStrategy::BreadthFirst))
            }
            SearchEngineName::DepthFirst => {
                Box::new(FrontierSearch::new(FrontierStrategy::DepthFirst))
            }
            SearchEngineName::DepthLimited => Box::new(FrontierSearch::new(
                FrontierStrategy::DepthLimited(depth_limit),
            )),
            SearchEngineName::IterativeDeepening => Box::new(IterativeDeepening::new(depth_limit)),
            SearchEngineName::GreedyBestFirst => {
                Box::new(FrontierSearch::new(FrontierStrategy::GreedyBestFirst))
            }
            SearchEngineName::AStar => Box::new(FrontierSearch::new(FrontierStrategy::AStar)),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SearchEngineName::BreadthFirst => "breadth-first search",
            SearchEngineName::DepthFirst => "depth-first search",
            SearchEngineName::DepthLimited => "depth-limited search",
            SearchEngineName::IterativeDeepening => "iterative deepening search",
            SearchEngineName::GreedyBestFirst => "greedy best-first search",
            SearchEngineName::AStar => "A* search",
        }
    }
}
