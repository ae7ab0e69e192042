use crate::grid::{Direction, GridModel, Position};
use crate::mdp::EnvironmentConfig;
use rand::Rng;
use strum::IntoEnumIterator;

/// The city seen as a Markov decision process. Every valid cell is a state;
/// targets and fatal hazards are absorbing.
///
/// Moves are stochastic: an action goes in its intended direction with
/// probability `stochasticity`, otherwise in one of the two perpendicular
/// directions with equal probability. A move that would leave the city or
/// enter a blocked cell leaves the agent where it is.
#[derive(Debug, Clone)]
pub struct CityEnvironment {
    grid: GridModel,
    departure: Position,
    step_penalty: f64,
    hazard_penalty: f64,
    stochasticity: f64,
}

impl CityEnvironment {
    pub fn new(grid: GridModel, departure: Position, config: &EnvironmentConfig) -> Self {
        Self {
            grid,
            departure,
            step_penalty: config.step_penalty,
            hazard_penalty: config.hazard_penalty,
            stochasticity: config.stochasticity,
        }
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn departure(&self) -> Position {
        self.departure
    }

    pub fn stochasticity(&self) -> f64 {
        self.stochasticity
    }

    pub fn is_terminal(&self, state: &Position) -> bool {
        self.grid.is_terminal(state)
    }

    /// Reward for arriving at `state`.
    pub fn reward(&self, state: &Position) -> f64 {
        if let Some(reward) = self.grid.target_reward(state) {
            reward
        } else if self.grid.is_hazard(state) {
            self.hazard_penalty
        } else if let Some(reward) = self.grid.fatal_reward(state) {
            reward
        } else {
            self.step_penalty
        }
    }

    /// Whether taking `action` as intended from `state` lands on a valid cell.
    pub fn is_valid_action(&self, state: &Position, action: Direction) -> bool {
        self.grid.valid(&state.neighbour(action))
    }

    pub fn valid_actions(&self, state: &Position) -> Vec<Direction> {
        Direction::iter()
            .filter(|&action| self.is_valid_action(state, action))
            .collect()
    }

    /// The deterministic outcome of moving in `direction`.
    pub fn resolve(&self, state: Position, direction: Direction) -> Position {
        let next = state.neighbour(direction);
        if self.grid.valid(&next) {
            next
        } else {
            state
        }
    }

    /// Sample the direction the agent actually moves in when it tries to
    /// move in `action`.
    pub fn drift<R: Rng + ?Sized>(&self, action: Direction, rng: &mut R) -> Direction {
        if rng.gen::<f64>() < self.stochasticity {
            action
        } else {
            action.perpendiculars()[rng.gen_range(0..2)]
        }
    }

    /// Apply `action` in `state`, returning the resulting state and the
    /// reward for arriving there.
    pub fn step<R: Rng + ?Sized>(
        &self,
        state: Position,
        action: Direction,
        rng: &mut R,
    ) -> (Position, f64) {
        let direction = self.drift(action, rng);
        let next_state = self.resolve(state, direction);
        (next_state, self.reward(&next_state))
    }

    /// All states, in row-major order.
    pub fn states(&self) -> impl Iterator<Item = Position> + '_ {
        self.grid.positions()
    }

    pub fn non_terminal_states(&self) -> impl Iterator<Item = Position> + '_ {
        self.states().filter(|state| !self.is_terminal(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    #[test]
    fn rewards_follow_lookup_order() {
        let env = classic_environment(0.8);
        assert_eq!(env.reward(&Position::new(0, 3)), 1.);
        assert_eq!(env.reward(&Position::new(1, 3)), -1.);
        assert_eq!(env.reward(&Position::new(0, 0)), -0.04);

        let env = CityEnvironment::new(
            env.grid().clone().with_hazards([Position::new(2, 2)]),
            env.departure(),
            &EnvironmentConfig::default(),
        );
        assert_eq!(env.reward(&Position::new(2, 2)), -5.);
    }

    #[test]
    fn terminal_states() {
        let env = classic_environment(0.8);
        assert!(env.is_terminal(&Position::new(0, 3)));
        assert!(env.is_terminal(&Position::new(1, 3)));
        assert!(!env.is_terminal(&Position::new(2, 0)));
        assert_eq!(env.non_terminal_states().count(), 9);
    }

    #[test]
    fn invalid_moves_stay_in_place() {
        let env = classic_environment(1.);
        let mut rng = StdRng::seed_from_u64(0);
        // Into the blocked cell
        assert_eq!(
            env.step(Position::new(1, 0), Direction::Right, &mut rng).0,
            Position::new(1, 0)
        );
        // Off the edge
        let (state, reward) = env.step(Position::new(2, 0), Direction::Down, &mut rng);
        assert_eq!(state, Position::new(2, 0));
        assert_eq!(reward, -0.04);
        assert_eq!(
            env.valid_actions(&Position::new(2, 0)),
            vec![Direction::Up, Direction::Right]
        );
    }

    #[test]
    fn deterministic_environment_moves_as_intended() {
        let env = classic_environment(1.);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let (state, reward) = env.step(Position::new(0, 2), Direction::Right, &mut rng);
            assert_eq!(state, Position::new(0, 3));
            assert_eq!(reward, 1.);
        }
    }

    #[test]
    fn drift_splits_evenly_between_perpendiculars() {
        let env = classic_environment(0.8);
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<Direction, u32> = HashMap::new();
        let samples = 20_000;
        for _ in 0..samples {
            *counts.entry(env.drift(Direction::Up, &mut rng)).or_default() += 1;
        }
        assert_eq!(counts.get(&Direction::Down), None);
        let fraction =
            |direction: Direction| *counts.get(&direction).unwrap_or(&0) as f64 / samples as f64;
        assert!((fraction(Direction::Up) - 0.8).abs() < 0.02);
        assert!((fraction(Direction::Left) - 0.1).abs() < 0.02);
        assert!((fraction(Direction::Right) - 0.1).abs() < 0.02);
    }
}
