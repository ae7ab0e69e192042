use crate::mdp::{CityEnvironment, MdpConfig, Policy, PolicyIterationAgent, QLearningAgent};
use std::fmt::Debug;

/// Something that turns an environment into a policy.
pub trait PolicySolver: Debug {
    fn solve(&mut self, env: &CityEnvironment) -> Policy;
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MdpAgentName {
    #[value(
        name = "q-learning",
        help = "Model-free Q-learning with epsilon-greedy exploration."
    )]
    QLearning,
    #[value(
        name = "policy-iteration",
        help = "Policy iteration using the known transition model."
    )]
    PolicyIteration,
}

impl MdpAgentName {
    pub const ALL: [MdpAgentName; 2] = [MdpAgentName::QLearning, MdpAgentName::PolicyIteration];

    pub fn create(&self, config: &MdpConfig) -> Box<dyn PolicySolver> {
        match self {
            MdpAgentName::QLearning => Box::new(QLearningAgent::new(config.q_learning.clone())),
            MdpAgentName::PolicyIteration => Box::new(PolicyIterationAgent::new(
                config.policy_iteration.clone(),
            )),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            MdpAgentName::QLearning => "Q-learning",
            MdpAgentName::PolicyIteration => "Policy iteration",
        }
    }
}
