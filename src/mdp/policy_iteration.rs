use crate::grid::{Direction, Position};
use crate::mdp::{CityEnvironment, Policy, PolicyIterationConfig, PolicySolver};
use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::time::Instant;
use strum::IntoEnumIterator;
use tracing::{debug, info};

/// Estimated utility of every state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UtilityTable {
    values: BTreeMap<Position, f64>,
}

impl UtilityTable {
    pub fn get(&self, state: &Position) -> f64 {
        self.values.get(state).copied().unwrap_or(0.)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Position, f64)> + '_ {
        self.values.iter().map(|(&state, &value)| (state, value))
    }
}

impl Display for UtilityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (state, value) in self.iter() {
            writeln!(f, "\"{}\": {:.4}", state, value)?;
        }
        Ok(())
    }
}

/// Policy iteration over the full state space.
///
/// Each sweep performs one synchronous evaluation step followed by a greedy
/// improvement step. Terminal states keep their terminal reward as utility.
#[derive(Debug)]
pub struct PolicyIterationAgent {
    config: PolicyIterationConfig,
    initial_policy: Option<Policy>,
    utilities: UtilityTable,
    policy: Policy,
    sweeps: u32,
}

impl PolicyIterationAgent {
    pub fn new(config: PolicyIterationConfig) -> Self {
        Self {
            config,
            initial_policy: None,
            utilities: UtilityTable::default(),
            policy: Policy::new(),
            sweeps: 0,
        }
    }

    /// Start from `policy` instead of the first valid action of each state.
    /// States the policy does not cover still get the default.
    pub fn with_initial_policy(mut self, policy: Policy) -> Self {
        self.initial_policy = Some(policy);
        self
    }

    pub fn utilities(&self) -> &UtilityTable {
        &self.utilities
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn sweeps(&self) -> u32 {
        self.sweeps
    }

    /// Reset utilities to the terminal reward of absorbing states and zero
    /// elsewhere, and pick the starting policy. A state with no valid move
    /// still gets an action, UP, which leaves it in place.
    pub fn initialise(&mut self, env: &CityEnvironment) {
        self.utilities = UtilityTable {
            values: env
                .states()
                .map(|state| (state, env.grid().terminal_reward(&state).unwrap_or(0.)))
                .collect(),
        };
        self.policy = env
            .non_terminal_states()
            .map(|state| {
                let preset = self
                    .initial_policy
                    .as_ref()
                    .and_then(|policy| policy.get(&state))
                    .filter(|&action| env.is_valid_action(&state, action));
                let action = preset
                    .or_else(|| env.valid_actions(&state).first().copied())
                    .unwrap_or(Direction::Up);
                (state, action)
            })
            .collect();
        self.sweeps = 0;
    }

    /// Expected utility of trying `action` in `state`. Outcomes that would
    /// leave the city or hit a blocked cell contribute nothing.
    pub fn transition_value(
        &self,
        env: &CityEnvironment,
        state: &Position,
        action: Direction,
    ) -> f64 {
        let p = env.stochasticity();
        let mut value = 0.;
        if env.is_valid_action(state, action) {
            value += p * self.utilities.get(&state.neighbour(action));
        }
        for perpendicular in action.perpendiculars() {
            if env.is_valid_action(state, perpendicular) {
                value += (1. - p) / 2. * self.utilities.get(&state.neighbour(perpendicular));
            }
        }
        value
    }

    /// One synchronous evaluation step of the current policy. Returns the
    /// largest change in any utility.
    pub fn evaluate(&mut self, env: &CityEnvironment) -> f64 {
        let gamma = self.config.gamma;
        let mut delta: f64 = 0.;
        let values: BTreeMap<Position, f64> = self
            .utilities
            .iter()
            .map(|(state, old)| {
                let new = match self.policy.get(&state) {
                    Some(action) if !env.is_terminal(&state) => {
                        env.reward(&state) + gamma * self.transition_value(env, &state, action)
                    }
                    _ => old,
                };
                delta = delta.max((new - old).abs());
                (state, new)
            })
            .collect();
        self.utilities = UtilityTable { values };
        delta
    }

    /// Replace the policy by the greedy one with respect to the current
    /// utilities. Directions are tried in the order UP, RIGHT, DOWN, LEFT and
    /// a later one only wins if it is strictly better. Returns whether any
    /// action changed.
    pub fn improve(&mut self, env: &CityEnvironment) -> bool {
        let improved: Policy = self
            .policy
            .iter()
            .map(|(state, current)| {
                let mut best_action = current;
                let mut best_value = f64::NEG_INFINITY;
                for action in Direction::iter() {
                    if !env.is_valid_action(&state, action) {
                        continue;
                    }
                    let value = self.transition_value(env, &state, action);
                    if value > best_value {
                        best_value = value;
                        best_action = action;
                    }
                }
                (state, best_action)
            })
            .collect();
        let changed = improved != self.policy;
        self.policy = improved;
        changed
    }

    /// Evaluate then improve once. Returns the evaluation delta and whether
    /// the policy changed.
    pub fn sweep(&mut self, env: &CityEnvironment) -> (f64, bool) {
        let delta = self.evaluate(env);
        let changed = self.improve(env);
        self.sweeps += 1;
        debug!(sweep = self.sweeps, delta, changed, "policy iteration sweep");
        (delta, changed)
    }

    /// Run the configured number of sweeps from a fresh start, stopping
    /// early when a tolerance is configured and the policy has settled.
    pub fn solve(&mut self, env: &CityEnvironment) -> Policy {
        info!(
            iterations = self.config.iterations,
            gamma = self.config.gamma,
            "starting policy iteration"
        );
        let start_time = Instant::now();
        self.initialise(env);
        for _ in 0..self.config.iterations {
            let (delta, changed) = self.sweep(env);
            if let Some(tolerance) = self.config.tolerance {
                if !changed && delta <= tolerance {
                    break;
                }
            }
        }
        info!(
            sweeps = self.sweeps,
            duration = start_time.elapsed().as_secs_f64(),
            "finished policy iteration"
        );
        self.policy.clone()
    }
}

impl PolicySolver for PolicyIterationAgent {
    fn solve(&mut self, env: &CityEnvironment) -> Policy {
        PolicyIterationAgent::solve(self, env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridModel;
    use crate::mdp::EnvironmentConfig;
    use crate::test_utils::*;
    use assert_approx_eq::assert_approx_eq;

    fn config(iterations: u32) -> PolicyIterationConfig {
        PolicyIterationConfig {
            iterations,
            ..PolicyIterationConfig::default()
        }
    }

    #[test]
    fn initial_policy_takes_first_valid_action() {
        let env = classic_environment(0.8);
        let mut agent = PolicyIterationAgent::new(config(0));
        agent.initialise(&env);
        assert_eq!(agent.policy().len(), 9);
        assert_eq!(agent.policy().get(&Position::new(0, 0)), Some(Direction::Right));
        assert_eq!(agent.policy().get(&Position::new(2, 0)), Some(Direction::Up));
        assert_eq!(agent.policy().get(&Position::new(0, 3)), None);
        assert_approx_eq!(agent.utilities().get(&Position::new(2, 0)), 0.);
        assert_approx_eq!(agent.utilities().get(&Position::new(0, 3)), 1.);
        assert_approx_eq!(agent.utilities().get(&Position::new(1, 3)), -1.);
    }

    #[test]
    fn non_terminal_utilities_start_at_zero() {
        let grid = GridModel::new(1, 4)
            .with_hazards([Position::new(0, 1)])
            .with_targets([(Position::new(0, 3), 1.)]);
        let env = CityEnvironment::new(grid, Position::new(0, 0), &EnvironmentConfig::default());
        let mut agent = PolicyIterationAgent::new(config(0));
        agent.initialise(&env);
        assert_eq!(agent.utilities().get(&Position::new(0, 0)), 0.);
        assert_eq!(agent.utilities().get(&Position::new(0, 1)), 0.);
        assert_eq!(agent.utilities().get(&Position::new(0, 3)), 1.);

        // (0, 0) moves right into the hazard cell, whose utility is still zero.
        agent.sweep(&env);
        assert_approx_eq!(agent.utilities().get(&Position::new(0, 0)), -0.04);
        assert_approx_eq!(agent.utilities().get(&Position::new(0, 1)), -5.);
    }

    #[test]
    fn walled_in_state_keeps_an_action() {
        let grid = GridModel::new(1, 3)
            .with_blocked([Position::new(0, 1)])
            .with_targets([(Position::new(0, 2), 1.)]);
        let env = CityEnvironment::new(grid, Position::new(0, 0), &EnvironmentConfig::default());
        let mut agent = PolicyIterationAgent::new(config(10));
        let policy = agent.solve(&env);
        assert_eq!(policy.len(), env.non_terminal_states().count());
        assert_eq!(policy.get(&Position::new(0, 0)), Some(Direction::Up));
        assert_approx_eq!(agent.utilities().get(&Position::new(0, 0)), -0.04);
    }

    #[test]
    fn supplied_initial_policy_is_used_where_valid() {
        let env = classic_environment(0.8);
        let preset: Policy = [
            (Position::new(2, 0), Direction::Right),
            (Position::new(0, 0), Direction::Left),
        ]
        .into_iter()
        .collect();
        let mut agent = PolicyIterationAgent::new(config(0)).with_initial_policy(preset);
        agent.initialise(&env);
        assert_eq!(agent.policy().get(&Position::new(2, 0)), Some(Direction::Right));
        // Left leaves the city, so the default takes over.
        assert_eq!(agent.policy().get(&Position::new(0, 0)), Some(Direction::Right));
    }

    #[test]
    fn transition_value_drops_invalid_outcomes() {
        let env = classic_environment(0.8);
        let mut agent = PolicyIterationAgent::new(config(0));
        agent.initialise(&env);
        // From (0, 2) moving right: 0.8 onto the target, 0.1 upwards off the
        // city and 0.1 down to (1, 2).
        let value = agent.transition_value(&env, &Position::new(0, 2), Direction::Right);
        assert_approx_eq!(value, 0.8 * 1.);
        // From (1, 2) moving right: 0.8 onto the fatal hazard, 0.1 up to (0, 2)
        // and 0.1 down to (2, 2).
        let value = agent.transition_value(&env, &Position::new(1, 2), Direction::Right);
        assert_approx_eq!(value, 0.8 * -1.);
        // From (0, 2) moving down: 0.1 right onto the target, 0.1 left to (0, 1).
        let value = agent.transition_value(&env, &Position::new(0, 2), Direction::Down);
        assert_approx_eq!(value, 0.1 * 1.);
    }

    #[test]
    fn evaluation_is_synchronous() {
        let env = classic_environment(1.);
        let mut agent = PolicyIterationAgent::new(config(0));
        agent.initialise(&env);
        agent.policy.insert(Position::new(0, 1), Direction::Right);
        agent.policy.insert(Position::new(0, 2), Direction::Right);
        agent.evaluate(&env);
        // (0, 1) must see the old utility of (0, 2), not the updated one.
        assert_approx_eq!(agent.utilities().get(&Position::new(0, 2)), -0.04 + 0.9);
        assert_approx_eq!(agent.utilities().get(&Position::new(0, 1)), -0.04);
    }

    #[test]
    fn terminal_utilities_equal_their_rewards() {
        let env = classic_environment(0.8);
        let mut agent = PolicyIterationAgent::new(config(50));
        agent.solve(&env);
        assert_eq!(agent.utilities().len(), 11);
        assert_approx_eq!(agent.utilities().get(&Position::new(0, 3)), 1.);
        assert_approx_eq!(agent.utilities().get(&Position::new(1, 3)), -1.);
    }

    #[test]
    fn solved_policy_is_a_fixed_point() {
        let env = classic_environment(0.8);
        let mut agent = PolicyIterationAgent::new(config(200));
        let policy = agent.solve(&env);
        assert_eq!(policy.get(&Position::new(0, 2)), Some(Direction::Right));
        assert_eq!(policy.get(&Position::new(0, 0)), Some(Direction::Right));
        assert_eq!(policy.get(&Position::new(1, 0)), Some(Direction::Up));

        let (_, changed) = agent.sweep(&env);
        assert!(!changed);
        assert_eq!(agent.policy(), &policy);
    }

    #[test]
    fn corridor_policy_points_at_target() {
        let grid = GridModel::new(1, 5).with_targets([(Position::new(0, 4), 1.)]);
        let env = CityEnvironment::new(grid, Position::new(0, 0), &EnvironmentConfig::default());
        let mut agent = PolicyIterationAgent::new(config(100));
        let policy = agent.solve(&env);
        for col in 0..4 {
            assert_eq!(policy.get(&Position::new(0, col)), Some(Direction::Right));
        }
    }

    #[test]
    fn tolerance_stops_early() {
        let env = classic_environment(0.8);
        let mut agent = PolicyIterationAgent::new(PolicyIterationConfig {
            tolerance: Some(1e-9),
            ..config(1000)
        });
        let policy = agent.solve(&env);
        assert!(agent.sweeps() < 1000);

        let mut exhaustive = PolicyIterationAgent::new(config(1000));
        assert_eq!(exhaustive.solve(&env), policy);
    }
}
