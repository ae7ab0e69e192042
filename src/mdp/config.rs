use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{name} must lie in [{min}, {max}], got {value}")]
    OutOfRange {
        name: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

fn check_interval(name: &'static str, value: f64, min: f64, max: f64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        })
    }
}

/// Dynamics and rewards of the city as seen by the MDP agents.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EnvironmentConfig {
    /// Reward for stepping onto an ordinary cell
    pub step_penalty: f64,
    /// Reward for stepping onto a hazard cell
    pub hazard_penalty: f64,
    /// Probability that an action moves the agent in the intended direction.
    /// The rest is split evenly between the two perpendicular directions.
    pub stochasticity: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            step_penalty: -0.04,
            hazard_penalty: -5.,
            stochasticity: 0.8,
        }
    }
}

impl EnvironmentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_interval("stochasticity", self.stochasticity, 0., 1.)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct QLearningConfig {
    pub episodes: u32,
    /// Initial learning rate
    pub alpha: f64,
    /// Discount factor
    pub gamma: f64,
    /// Initial exploration probability
    pub epsilon: f64,
    /// Factor applied to epsilon each time an episode reaches a terminal
    /// state
    pub epsilon_decay: f64,
    /// The learning rate of episode `k` is `alpha * alpha_decay^k`. A value
    /// of 1 keeps the learning rate constant.
    pub alpha_decay: f64,
    /// Episodes that have not reached a terminal state after this many steps
    /// are abandoned.
    pub max_steps_per_episode: usize,
    /// Seed for the agent's random number generator, drawn from the OS when
    /// absent.
    pub seed: Option<u64>,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            episodes: 1000,
            alpha: 0.2,
            gamma: 0.9,
            epsilon: 0.3,
            epsilon_decay: 0.05,
            alpha_decay: 0.999,
            max_steps_per_episode: 10_000,
            seed: None,
        }
    }
}

impl QLearningConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_interval("alpha", self.alpha, 0., 1.)?;
        check_interval("gamma", self.gamma, 0., 1.)?;
        check_interval("epsilon", self.epsilon, 0., 1.)?;
        check_interval("epsilon-decay", self.epsilon_decay, 0., 1.)?;
        check_interval("alpha-decay", self.alpha_decay, 0., 1.)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct PolicyIterationConfig {
    /// Number of evaluation and improvement sweeps
    pub iterations: u32,
    /// Discount factor
    pub gamma: f64,
    /// When set, stop early once a sweep leaves the policy unchanged and
    /// moves no utility by more than this amount.
    pub tolerance: Option<f64>,
}

impl Default for PolicyIterationConfig {
    fn default() -> Self {
        Self {
            iterations: 1000,
            gamma: 0.9,
            tolerance: None,
        }
    }
}

impl PolicyIterationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_interval("gamma", self.gamma, 0., 1.)?;
        if let Some(tolerance) = self.tolerance {
            check_interval("tolerance", tolerance, 0., f64::INFINITY)?;
        }
        Ok(())
    }
}

/// All MDP settings, as read from a TOML file. Every field has a default so
/// a config file only needs to mention what it changes.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct MdpConfig {
    pub environment: EnvironmentConfig,
    pub q_learning: QLearningConfig,
    pub policy_iteration: PolicyIterationConfig,
}

impl MdpConfig {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(&text)
    }

    pub fn from_text(text: &str) -> Result<Self, ConfigError> {
        let config: MdpConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.environment.validate()?;
        self.q_learning.validate()?;
        self.policy_iteration.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = MdpConfig::from_text("").unwrap();
        assert_eq!(config, MdpConfig::default());
        assert_eq!(config.q_learning.episodes, 1000);
        assert_eq!(config.environment.stochasticity, 0.8);
    }

    #[test]
    fn partial_config_overrides_fields() {
        let text = r#"
            [environment]
            stochasticity = 1.0
            hazard-penalty = -10.0

            [q-learning]
            episodes = 50
            seed = 7

            [policy-iteration]
            tolerance = 1e-6
        "#;
        let config = MdpConfig::from_text(text).unwrap();
        assert_eq!(config.environment.stochasticity, 1.);
        assert_eq!(config.environment.hazard_penalty, -10.);
        assert_eq!(config.environment.step_penalty, -0.04);
        assert_eq!(config.q_learning.episodes, 50);
        assert_eq!(config.q_learning.seed, Some(7));
        assert_eq!(config.q_learning.alpha, 0.2);
        assert_eq!(config.policy_iteration.tolerance, Some(1e-6));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let text = r#"
            [q-learning]
            alpha = 1.5
        "#;
        match MdpConfig::from_text(text) {
            Err(ConfigError::OutOfRange { name, .. }) => assert_eq!(name, "alpha"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(matches!(
            MdpConfig::from_text("[environment]\nstochasticity = -0.1"),
            Err(ConfigError::OutOfRange { .. })
        ));
        assert!(matches!(
            MdpConfig::from_text("episodes = ["),
            Err(ConfigError::Parse(_))
        ));
    }
}
