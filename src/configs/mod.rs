mod builder;
mod job;
pub mod json;
mod training;

pub use builder::LaunchConfigBuilder;
pub use job::{COORDINATOR_PORT, DEFAULT_COORDINATOR, JobCoordinates};
pub use training::{
    DEFAULT_DIST_BACKEND, DEFAULT_EPOCHS, DEVICES_PER_NODE, RUN_COUNT, TrainingParameters,
};
