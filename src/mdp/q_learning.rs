use crate::grid::{Direction, Position};
use crate::mdp::{CityEnvironment, Policy, PolicySolver, QLearningConfig};
use rand::rngs::StdRng;
use rand::seq::{IteratorRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::time::{Duration, Instant};
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

/// Action-value estimates, zero until first updated.
#[derive(Debug, Clone, Default)]
pub struct QTable {
    values: HashMap<(Position, Direction), f64>,
}

impl QTable {
    pub fn get(&self, state: Position, action: Direction) -> f64 {
        self.values.get(&(state, action)).copied().unwrap_or(0.)
    }

    fn set(&mut self, state: Position, action: Direction, value: f64) {
        self.values.insert((state, action), value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Display for QTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut states: Vec<Position> = self.values.keys().map(|&(state, _)| state).collect();
        states.sort();
        states.dedup();
        for state in states {
            write!(f, "{}:", state)?;
            for action in Direction::iter() {
                write!(f, " {}={:.4}", action, self.get(state, action))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct QLearningStatistics {
    /// Episodes that reached a terminal state
    completed_episodes: u32,
    /// Episodes abandoned at the step limit
    truncated_episodes: u32,
    /// Environment steps over all episodes
    total_steps: u64,
    duration: Duration,
}

impl QLearningStatistics {
    pub fn completed_episodes(&self) -> u32 {
        self.completed_episodes
    }

    pub fn truncated_episodes(&self) -> u32 {
        self.truncated_episodes
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }
}

impl Display for QLearningStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Episodes: {}",
            self.completed_episodes + self.truncated_episodes
        )?;
        writeln!(f, "Truncated episodes: {}", self.truncated_episodes)?;
        writeln!(f, "Total steps: {}", self.total_steps)?;
        write!(
            f,
            "Execution time: {}",
            humantime::format_duration(self.duration)
        )
    }
}

/// Tabular Q-learning with epsilon-greedy exploration.
///
/// Epsilon shrinks by a constant factor every time an episode reaches a
/// terminal state, and the learning rate decays geometrically with the
/// episode number.
#[derive(Debug)]
pub struct QLearningAgent {
    config: QLearningConfig,
    q_table: QTable,
    epsilon: f64,
    alpha: f64,
    episode: u32,
    rng: StdRng,
    statistics: QLearningStatistics,
}

impl QLearningAgent {
    pub fn new(config: QLearningConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            epsilon: config.epsilon,
            alpha: config.alpha,
            config,
            q_table: QTable::default(),
            episode: 0,
            rng,
            statistics: QLearningStatistics::default(),
        }
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn statistics(&self) -> &QLearningStatistics {
        &self.statistics
    }

    /// Actions worth considering in `state`: those that stay inside the
    /// city. Invalid actions only come into play when there is no valid one.
    fn candidate_actions(env: &CityEnvironment, state: &Position) -> Vec<Direction> {
        let valid = env.valid_actions(state);
        if valid.is_empty() {
            Direction::iter().collect()
        } else {
            valid
        }
    }

    /// Highest estimate among the candidate actions of `state`.
    fn best_value(&self, env: &CityEnvironment, state: Position) -> f64 {
        Self::candidate_actions(env, &state)
            .into_iter()
            .map(|action| self.q_table.get(state, action))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// The candidate action with the highest estimate, ties broken uniformly
    /// at random.
    fn greedy_action(&mut self, env: &CityEnvironment, state: Position) -> Direction {
        let candidates = Self::candidate_actions(env, &state);
        let best = self.best_value(env, state);
        let tied: Vec<Direction> = candidates
            .into_iter()
            .filter(|&action| self.q_table.get(state, action) == best)
            .collect();
        tied.choose(&mut self.rng).copied().unwrap_or(Direction::Up)
    }

    fn update(
        &mut self,
        env: &CityEnvironment,
        state: Position,
        action: Direction,
        reward: f64,
        next_state: Position,
        terminal: bool,
    ) {
        let target = if terminal {
            reward
        } else {
            reward + self.config.gamma * self.best_value(env, next_state)
        };
        let q_value = self.q_table.get(state, action);
        let new_q_value = (1. - self.alpha) * q_value + self.alpha * target;
        self.q_table.set(state, action, new_q_value);
    }

    /// Run one episode from the departure until a terminal state is reached
    /// or the step limit runs out.
    fn run_episode(&mut self, env: &CityEnvironment) {
        self.alpha = self.config.alpha * self.config.alpha_decay.powi(self.episode as i32);

        let mut state = env.departure();
        let mut steps = 0;
        while !env.is_terminal(&state) {
            if steps >= self.config.max_steps_per_episode {
                warn!(
                    episode = self.episode,
                    steps, "episode abandoned without reaching a terminal state"
                );
                self.statistics.truncated_episodes += 1;
                self.statistics.total_steps += steps as u64;
                self.episode += 1;
                return;
            }

            let greedy = self.greedy_action(env, state);
            let action = if self.rng.gen::<f64>() < self.epsilon {
                Direction::iter().choose(&mut self.rng).unwrap_or(greedy)
            } else {
                greedy
            };

            let (next_state, reward) = env.step(state, action, &mut self.rng);
            let terminal = env.is_terminal(&next_state);
            if terminal {
                self.epsilon *= self.config.epsilon_decay;
            }
            self.update(env, state, action, reward, next_state, terminal);

            state = next_state;
            steps += 1;
        }

        debug!(episode = self.episode, steps, final_state = %state, "episode finished");
        self.statistics.completed_episodes += 1;
        self.statistics.total_steps += steps as u64;
        self.episode += 1;
    }

    /// The greedy action of every non-terminal state.
    pub fn extract_policy(&mut self, env: &CityEnvironment) -> Policy {
        let states: Vec<Position> = env.non_terminal_states().collect();
        states
            .into_iter()
            .map(|state| (state, self.greedy_action(env, state)))
            .collect()
    }

    /// Run the configured number of episodes and return the learnt policy.
    pub fn learn(&mut self, env: &CityEnvironment) -> Policy {
        info!(
            episodes = self.config.episodes,
            alpha = self.config.alpha,
            gamma = self.config.gamma,
            epsilon = self.config.epsilon,
            "starting q-learning"
        );
        let start_time = Instant::now();
        for _ in 0..self.config.episodes {
            self.run_episode(env);
        }
        self.statistics.duration += start_time.elapsed();
        info!(
            completed_episodes = self.statistics.completed_episodes,
            truncated_episodes = self.statistics.truncated_episodes,
            total_steps = self.statistics.total_steps,
            duration = self.statistics.duration.as_secs_f64(),
            "finished q-learning"
        );
        self.extract_policy(env)
    }
}

impl PolicySolver for QLearningAgent {
    fn solve(&mut self, env: &CityEnvironment) -> Policy {
        self.learn(env)
    }
}
