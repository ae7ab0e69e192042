use crate::instance::Instance;
use crate::mdp::{CityEnvironment, EnvironmentConfig};

/// A 5x5 city with one blocked cell, one hazard and two trapped people.
pub const SEARCH_INSTANCE_TEXT: &str = r#"{
    "city": {"rows": 5, "columns": 5, "blocked": [[1, 1]]},
    "departure": [0, 0],
    "dangers": [[2, 2]],
    "trapped": [[0, 4], [4, 4]]
}"#;

/// The classic 3x4 grid world: a wall in the middle, a rewarding exit in the
/// top-right corner and a fatal one just below it.
pub const MDP_INSTANCE_TEXT: &str = r#"{
    "city": {"rows": 3, "columns": 4, "blocked": [[1, 1]]},
    "departure": [2, 0],
    "fatal_dangers": [[1, 3, -1.0]],
    "trapped": [[0, 3, 1.0]]
}"#;

pub fn classic_environment(stochasticity: f64) -> CityEnvironment {
    let instance = Instance::from_text(MDP_INSTANCE_TEXT).unwrap();
    let config = EnvironmentConfig {
        stochasticity,
        ..EnvironmentConfig::default()
    };
    CityEnvironment::new(instance.grid(), instance.departure(), &config)
}
