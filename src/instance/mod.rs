//! Loading of rescue instances from their JSON description.

mod instance_error;
mod parsed_instance;

pub use instance_error::InstanceError;
pub use parsed_instance::{CityLayout, Instance, TrappedEntry, DEFAULT_TARGET_REWARD};
