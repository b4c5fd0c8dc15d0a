use crate::error::{LaunchError, Result};

/// Port every participant uses to rendezvous with the coordinator.
pub const COORDINATOR_PORT: u16 = 12394;

/// Coordinator address used when the caller does not provide one.
pub const DEFAULT_COORDINATOR: &str = "10.242.66.105";

/// Where this process sits inside the distributed job.
///
/// Every participant builds the same coordinates except for `rank`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobCoordinates {
    pub rank: usize,
    pub world_size: usize,
    pub coordinator_addr: String,
    pub coordinator_port: u16,
}

impl JobCoordinates {
    /// Creates the coordinates for one participant, using the fixed [`COORDINATOR_PORT`].
    pub fn new(rank: usize, world_size: usize, coordinator_addr: impl Into<String>) -> Self {
        Self {
            rank,
            world_size,
            coordinator_addr: coordinator_addr.into(),
            coordinator_port: COORDINATOR_PORT,
        }
    }

    /// Creates the coordinates from the values handed out by the scheduler
    /// (`SLURM_PROCID` and `SLURM_NTASKS`), already parsed by the caller.
    ///
    /// # Errors
    /// Returns `LaunchError::InvalidConfig` if either value is missing.
    pub fn from_scheduler(
        rank: Option<usize>,
        world_size: Option<usize>,
        coordinator_addr: impl Into<String>,
    ) -> Result<Self> {
        let rank = rank.ok_or_else(|| {
            LaunchError::InvalidConfig("process rank was not provided by the scheduler".into())
        })?;
        let world_size = world_size.ok_or_else(|| {
            LaunchError::InvalidConfig("task count was not provided by the scheduler".into())
        })?;

        Ok(Self::new(rank, world_size, coordinator_addr))
    }
}
