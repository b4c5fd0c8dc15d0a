use super::{JobCoordinates, RUN_COUNT, TrainingParameters};
use crate::{
    descriptor::{InvocationDescriptor, PyBool, Trainer, flag},
    error::{LaunchError, Result},
};

/// Turns the job coordinates and training parameters of one participant into
/// the ordered trainer invocations it has to run.
///
/// The builder is pure: it never reads the process environment, and identical
/// inputs always yield identical descriptors.
#[derive(Debug, Default)]
pub struct LaunchConfigBuilder;

impl LaunchConfigBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Builds the `[baseline, replicated]` descriptors.
    ///
    /// The replication factor must divide the world size (and so cannot exceed
    /// it), since the 1.5D trainer splits the job into `world_size / c` groups.
    /// This applies to the baseline too: both descriptors are produced or neither.
    ///
    /// # Errors
    /// Returns `LaunchError::InvalidConfig` before producing anything if any input
    /// is missing, zero or out of range.
    pub fn build(
        &self,
        job: &JobCoordinates,
        training: &TrainingParameters,
    ) -> Result<Vec<InvocationDescriptor>> {
        self.validate_job(job)?;
        self.validate_training(job, training)?;

        let args = self.adapt_args(job, training);
        let env = self.adapt_env(job);

        let mut replicated_args = args.clone();
        replicated_args.push(flag("replication", training.replication_factor));

        Ok(vec![
            InvocationDescriptor {
                trainer: Trainer::Baseline,
                args,
                env: env.clone(),
            },
            InvocationDescriptor {
                trainer: Trainer::Replicated,
                args: replicated_args,
                env,
            },
        ])
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    fn validate_job(&self, job: &JobCoordinates) -> Result<()> {
        if job.world_size == 0 {
            return Err(LaunchError::InvalidConfig(
                "world size must be greater than 0".into(),
            ));
        }

        if job.rank >= job.world_size {
            return Err(LaunchError::InvalidConfig(format!(
                "rank ({}) must be lower than world size ({})",
                job.rank, job.world_size
            )));
        }

        if job.coordinator_addr.trim().is_empty() {
            return Err(LaunchError::InvalidConfig(
                "coordinator address must not be empty".into(),
            ));
        }

        Ok(())
    }

    fn validate_training(&self, job: &JobCoordinates, training: &TrainingParameters) -> Result<()> {
        if training.graph_name.trim().is_empty() {
            return Err(LaunchError::InvalidConfig(
                "graph name must not be empty".into(),
            ));
        }

        if training.hidden_width == 0 {
            return Err(LaunchError::InvalidConfig(
                "hidden width must be greater than 0".into(),
            ));
        }

        if training.epochs == 0 {
            return Err(LaunchError::InvalidConfig(
                "epoch count must be greater than 0".into(),
            ));
        }

        if training.dist_backend.trim().is_empty() {
            return Err(LaunchError::InvalidConfig(
                "distributed backend must not be empty".into(),
            ));
        }

        // Processes are split into world_size / c replication groups of size c.
        let replication = training.replication_factor;
        if replication == 0 {
            return Err(LaunchError::InvalidConfig(
                "replication factor must be greater than 0".into(),
            ));
        }

        if replication > job.world_size {
            return Err(LaunchError::InvalidConfig(format!(
                "replication factor ({replication}) cannot exceed world size ({})",
                job.world_size
            )));
        }

        if job.world_size % replication != 0 {
            return Err(LaunchError::InvalidConfig(format!(
                "world size ({}) is not divisible by replication factor ({replication})",
                job.world_size
            )));
        }

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Adaptation
    // -------------------------------------------------------------------------

    fn adapt_args(&self, job: &JobCoordinates, training: &TrainingParameters) -> Vec<String> {
        vec![
            flag("accperrank", training.devices_per_node()),
            flag("epochs", training.epochs),
            flag("graphname", &training.graph_name),
            flag("midlayer", training.hidden_width),
            flag("runcount", RUN_COUNT),
            flag("activations", PyBool(true)),
            flag("normalization", PyBool(true)),
            flag("accuracy", PyBool(true)),
            flag("world-size", job.world_size),
            flag("rank", job.rank),
            flag("hostname", &job.coordinator_addr),
            flag("port", job.coordinator_port),
            flag("dist-backend", &training.dist_backend),
        ]
    }

    fn adapt_env(&self, job: &JobCoordinates) -> Vec<(String, String)> {
        let mut env = vec![
            ("MASTER_ADDR".to_string(), job.coordinator_addr.clone()),
            ("MASTER_PORT".to_string(), job.coordinator_port.to_string()),
            ("RANK".to_string(), job.rank.to_string()),
            ("WORLD_SIZE".to_string(), job.world_size.to_string()),
        ];
        env.sort();
        env
    }
}
