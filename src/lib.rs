pub mod configs;
pub mod descriptor;
pub mod error;
pub mod runner;

pub use configs::{JobCoordinates, LaunchConfigBuilder, TrainingParameters};
pub use descriptor::{InvocationDescriptor, Trainer};
pub use error::LaunchError;
pub use runner::{ExecutionPolicy, Runner};

/// Computes the trainer invocations this participant has to run.
///
/// # Errors
/// Returns `LaunchError::InvalidConfig` if the coordinates or parameters are invalid.
pub fn plan(
    job: &JobCoordinates,
    training: &TrainingParameters,
) -> Result<Vec<InvocationDescriptor>, LaunchError> {
    log::info!(rank = job.rank, world_size = job.world_size; "building launch plan");
    let descriptors = LaunchConfigBuilder::new().build(job, training)?;
    log::info!(
        "planned {} trainer(s) for graph {} (coordinator {}:{})",
        descriptors.len(),
        training.graph_name,
        job.coordinator_addr,
        job.coordinator_port
    );
    Ok(descriptors)
}
