mod agent;
mod config;
mod environment;
mod policy;
mod policy_iteration;
mod q_learning;

pub use agent::{MdpAgentName, PolicySolver};
pub use config::{
    ConfigError, EnvironmentConfig, MdpConfig, PolicyIterationConfig, QLearningConfig,
};
pub use environment::CityEnvironment;
pub use policy::Policy;
pub use policy_iteration::{PolicyIterationAgent, UtilityTable};
pub use q_learning::{QLearningAgent, QLearningStatistics, QTable};
