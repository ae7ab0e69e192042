use crate::grid::Position;
use crate::search::SearchResult;
use std::fmt::{self, Display};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Counters for a single mission, i.e. one search from the departure to one
/// trapped person.
#[derive(Debug, Clone)]
pub struct SearchStatistics {
    /// Number of nodes taken out of the frontier, closed or not
    expanded_nodes: i64,
    /// Number of successor nodes created
    generated_nodes: i64,
    /// Number of positions added to the closed set
    closed_nodes: i64,
    /// Number of extracted nodes skipped because their position was closed
    skipped_duplicates: i64,
    /// Number of nodes whose successors were pruned by a depth bound
    cutoff_nodes: i64,
    /// Length of the solution, if one was found
    solution_length: Option<usize>,
    /// Cost of the solution, if one was found
    solution_cost: Option<u32>,
    /// Time when the search started
    search_start_time: Instant,
    /// Wall-clock time of the whole search, set when it is finalised
    search_duration: Duration,
    /// Time when the last log was printed, used for periodic logging
    last_log_time: Instant,
}

impl Default for SearchStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchStatistics {
    pub fn new() -> Self {
        debug!("starting search");
        Self {
            expanded_nodes: 0,
            generated_nodes: 0,
            closed_nodes: 0,
            skipped_duplicates: 0,
            cutoff_nodes: 0,
            solution_length: None,
            solution_cost: None,
            search_start_time: Instant::now(),
            search_duration: Duration::ZERO,
            last_log_time: Instant::now(),
        }
    }

    pub fn increment_expanded_nodes(&mut self) {
        self.expanded_nodes += 1;
        self.log_if_needed();
    }

    pub fn increment_generated_nodes(&mut self, num_nodes: usize) {
        self.generated_nodes += num_nodes as i64;
        self.log_if_needed();
    }

    pub fn increment_closed_nodes(&mut self) {
        self.closed_nodes += 1;
    }

    pub fn increment_skipped_duplicates(&mut self) {
        self.skipped_duplicates += 1;
    }

    pub fn increment_cutoff_nodes(&mut self) {
        self.cutoff_nodes += 1;
    }

    fn log_if_needed(&mut self) {
        if self.last_log_time.elapsed().as_secs() > 10 {
            self.last_log_time = Instant::now();
            self.log();
        }
    }

    fn log(&self) {
        info!(
            expanded_nodes = self.expanded_nodes,
            generated_nodes = self.generated_nodes,
            closed_nodes = self.closed_nodes,
            skipped_duplicates = self.skipped_duplicates,
            cutoff_nodes = self.cutoff_nodes,
        );
    }

    /// Stop the clock and record the solution, if any.
    pub fn finalise_search(&mut self, result: &SearchResult) {
        self.search_duration = self.search_start_time.elapsed();
        if let SearchResult::Success(solution) = result {
            self.solution_length = Some(solution.len());
            self.solution_cost = Some(solution.cost());
        }
        debug!("finalising search");
        self.log();
        debug!(search_duration = self.search_duration.as_secs_f64());
    }

    pub fn expanded_nodes(&self) -> i64 {
        self.expanded_nodes
    }

    pub fn generated_nodes(&self) -> i64 {
        self.generated_nodes
    }

    pub fn closed_nodes(&self) -> i64 {
        self.closed_nodes
    }

    pub fn skipped_duplicates(&self) -> i64 {
        self.skipped_duplicates
    }

    pub fn cutoff_nodes(&self) -> i64 {
        self.cutoff_nodes
    }

    pub fn solution_length(&self) -> Option<usize> {
        self.solution_length
    }

    pub fn solution_cost(&self) -> Option<u32> {
        self.solution_cost
    }
}

impl Display for SearchStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Generated nodes: {}", self.generated_nodes)?;
        writeln!(f, "Expanded nodes: {}", self.expanded_nodes)?;
        writeln!(
            f,
            "Execution time: {}",
            humantime::format_duration(self.search_duration)
        )?;
        match (self.solution_length, self.solution_cost) {
            (Some(length), Some(cost)) => {
                writeln!(f, "Solution length: {}", length)?;
                write!(f, "Solution cost: {}", cost)
            }
            _ => write!(f, "No solution"),
        }
    }
}

/// Running totals over all missions of one search strategy. The caller owns
/// the accumulator and folds each mission into it once the mission is done.
#[derive(Debug, Clone, Default)]
pub struct AggregateStatistics {
    missions: usize,
    solved_missions: usize,
    expanded_nodes: i64,
    generated_nodes: i64,
    search_duration: Duration,
    solution_length: usize,
    solution_cost: u64,
    unsolved_targets: Vec<Position>,
}

impl AggregateStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every mission folded so far, ready for the next strategy.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn fold(&mut self, target: Position, statistics: &SearchStatistics) {
        self.missions += 1;
        self.expanded_nodes += statistics.expanded_nodes;
        self.generated_nodes += statistics.generated_nodes;
        self.search_duration += statistics.search_duration;
        match (statistics.solution_length, statistics.solution_cost) {
            (Some(length), Some(cost)) => {
                self.solved_missions += 1;
                self.solution_length += length;
                self.solution_cost += cost as u64;
            }
            _ => self.unsolved_targets.push(target),
        }
    }

    pub fn missions(&self) -> usize {
        self.missions
    }

    pub fn solved_missions(&self) -> usize {
        self.solved_missions
    }

    pub fn expanded_nodes(&self) -> i64 {
        self.expanded_nodes
    }

    pub fn generated_nodes(&self) -> i64 {
        self.generated_nodes
    }

    pub fn solution_length(&self) -> usize {
        self.solution_length
    }

    pub fn solution_cost(&self) -> u64 {
        self.solution_cost
    }

    pub fn unsolved_targets(&self) -> &[Position] {
        &self.unsolved_targets
    }

    pub fn log(&self) {
        info!(
            missions = self.missions,
            solved_missions = self.solved_missions,
            expanded_nodes = self.expanded_nodes,
            generated_nodes = self.generated_nodes,
            solution_length = self.solution_length,
            solution_cost = self.solution_cost,
            search_duration = self.search_duration.as_secs_f64(),
        );
    }
}

impl Display for AggregateStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Missions solved: {}/{}",
            self.solved_missions, self.missions
        )?;
        writeln!(f, "Total generated nodes: {}", self.generated_nodes)?;
        writeln!(f, "Total expanded nodes: {}", self.expanded_nodes)?;
        writeln!(
            f,
            "Total execution time: {}",
            humantime::format_duration(self.search_duration)
        )?;
        writeln!(f, "Total solution length: {}", self.solution_length)?;
        write!(f, "Total solution cost: {}", self.solution_cost)?;
        if !self.unsolved_targets.is_empty() {
            write!(f, "\nUnreachable targets:")?;
            for target in &self.unsolved_targets {
                write!(f, " {}", target)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Direction;
    use crate::search::Solution;

    fn solved(length: usize, cost: u32) -> SearchStatistics {
        let mut statistics = SearchStatistics::new();
        for _ in 0..length {
            statistics.increment_expanded_nodes();
        }
        statistics.increment_generated_nodes(2 * length);
        let actions = vec![Direction::Right; length];
        let positions = (0..=length as i32).map(|col| Position::new(0, col)).collect();
        statistics.finalise_search(&SearchResult::Success(Solution::new(
            actions, positions, cost,
        )));
        statistics
    }

    #[test]
    fn finalise_records_solution() {
        let statistics = solved(3, 7);
        assert_eq!(statistics.solution_length(), Some(3));
        assert_eq!(statistics.solution_cost(), Some(7));
        assert_eq!(statistics.generated_nodes(), 6);
    }

    #[test]
    fn aggregate_folds_and_resets() {
        let mut aggregate = AggregateStatistics::new();
        aggregate.fold(Position::new(0, 3), &solved(3, 7));
        aggregate.fold(Position::new(0, 2), &solved(2, 2));

        let mut unsolved = SearchStatistics::new();
        unsolved.increment_expanded_nodes();
        unsolved.finalise_search(&SearchResult::Unsolvable);
        aggregate.fold(Position::new(5, 5), &unsolved);

        assert_eq!(aggregate.missions(), 3);
        assert_eq!(aggregate.solved_missions(), 2);
        assert_eq!(aggregate.solution_length(), 5);
        assert_eq!(aggregate.solution_cost(), 9);
        assert_eq!(aggregate.expanded_nodes(), 6);
        assert_eq!(aggregate.unsolved_targets(), &[Position::new(5, 5)]);
        assert!(aggregate.to_string().contains("Missions solved: 2/3"));

        aggregate.reset();
        assert_eq!(aggregate.missions(), 0);
        assert!(aggregate.unsolved_targets().is_empty());
    }
}
