//! Uninformed and informed graph search over the city grid.

mod frontier;
mod graph_search;
mod heuristic;
mod iterative_deepening;
mod mission;
mod search_engine;
mod search_node;
mod search_space;
mod search_statistics;
mod solution;

pub use frontier::{BestFirstFrontier, FifoFrontier, Frontier, LifoFrontier, Priority};
pub use graph_search::{graph_search, FrontierSearch, FrontierStrategy};
pub use heuristic::{Heuristic, HeuristicValue, ManhattanDistance};
pub use iterative_deepening::IterativeDeepening;
pub use mission::{run_mission, run_missions, MissionReport};
pub use search_engine::{SearchEngine, SearchEngineName, SearchResult};
pub use search_node::{NodeId, SearchNode, NO_NODE};
pub use search_space::SearchSpace;
pub use search_statistics::{AggregateStatistics, SearchStatistics};
pub use solution::Solution;
