//! The city grid shared by the search and MDP halves of the crate.

mod direction;
mod grid_model;
mod position;

pub use direction::Direction;
pub use grid_model::{GridModel, HAZARD_STEP_COST, NORMAL_STEP_COST};
pub use position::Position;
