use std::{fmt, path::PathBuf, str::FromStr};

use futures::future;
use log::{debug, info, warn};
use tokio::process::Command;

use crate::{
    descriptor::InvocationDescriptor,
    error::{LaunchError, Result},
};

/// Interpreter used to run the trainer scripts unless overridden.
pub const DEFAULT_INTERPRETER: &str = "python";

/// How a [`Runner`] schedules the descriptors it is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionPolicy {
    /// Run in order, blocking on each, and stop at the first failure.
    #[default]
    Sequential,
    /// Run in order, blocking on each, even after a failure.
    Independent,
    /// Start every invocation at once and wait for all of them.
    Concurrent,
}

impl fmt::Display for ExecutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::Independent => write!(f, "independent"),
            Self::Concurrent => write!(f, "concurrent"),
        }
    }
}

impl FromStr for ExecutionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(Self::Sequential),
            "independent" => Ok(Self::Independent),
            "concurrent" => Ok(Self::Concurrent),
            other => Err(format!(
                "unknown policy: {other} (expected sequential, independent or concurrent)"
            )),
        }
    }
}

/// Spawns trainer invocations as child processes.
///
/// Children inherit stdio and the current environment, with each descriptor's
/// rendezvous variables layered on top. Dropping a pending run kills its children.
#[derive(Debug, Clone)]
pub struct Runner {
    interpreter: String,
    working_dir: Option<PathBuf>,
    policy: ExecutionPolicy,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            working_dir: None,
            policy: ExecutionPolicy::default(),
        }
    }

    pub fn interpreter(mut self, interpreter: impl Into<String>) -> Self {
        self.interpreter = interpreter.into();
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn policy(mut self, policy: ExecutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Runs every descriptor according to the configured policy.
    ///
    /// # Errors
    /// Returns the first failure in descriptor order: `LaunchError::Spawn` if a
    /// trainer could not be started or `LaunchError::Exited` if it exited non-zero.
    pub async fn run(&self, descriptors: &[InvocationDescriptor]) -> Result<()> {
        info!("running {} trainer(s) with {} policy", descriptors.len(), self.policy);

        match self.policy {
            ExecutionPolicy::Sequential => {
                for descriptor in descriptors {
                    self.run_one(descriptor).await?;
                }
                Ok(())
            }
            ExecutionPolicy::Independent => {
                let mut first_err = None;
                for descriptor in descriptors {
                    if let Err(e) = self.run_one(descriptor).await {
                        first_err.get_or_insert(e);
                    }
                }
                first_err.map_or(Ok(()), Err)
            }
            ExecutionPolicy::Concurrent => {
                let runs = descriptors.iter().map(|d| self.run_one(d));
                future::join_all(runs)
                    .await
                    .into_iter()
                    .collect::<Result<Vec<_>>>()
                    .map(|_| ())
            }
        }
    }

    async fn run_one(&self, descriptor: &InvocationDescriptor) -> Result<()> {
        let program = descriptor.program();

        let mut cmd = Command::new(&self.interpreter);
        cmd.arg(program)
            .args(&descriptor.args)
            .envs(descriptor.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .kill_on_drop(true);

        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }

        info!(trainer = program; "launching");
        debug!("{}", descriptor.command_line(&self.interpreter));

        let status = cmd.status().await.map_err(|source| LaunchError::Spawn {
            program: program.to_string(),
            source,
        })?;

        if status.success() {
            info!(trainer = program; "finished");
            return Ok(());
        }

        #[cfg(unix)]
        let signal = std::os::unix::process::ExitStatusExt::signal(&status);
        #[cfg(not(unix))]
        let signal = None;

        warn!(trainer = program; "exited with {status}");
        Err(LaunchError::Exited {
            program: program.to_string(),
            code: status.code(),
            signal,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parse() {
        assert_eq!("sequential".parse(), Ok(ExecutionPolicy::Sequential));
        assert_eq!("independent".parse(), Ok(ExecutionPolicy::Independent));
        assert_eq!("concurrent".parse(), Ok(ExecutionPolicy::Concurrent));
        assert!("parallel".parse::<ExecutionPolicy>().is_err());
    }

    #[test]
    fn test_policy_display_round_trips() {
        for policy in [
            ExecutionPolicy::Sequential,
            ExecutionPolicy::Independent,
            ExecutionPolicy::Concurrent,
        ] {
            assert_eq!(policy.to_string().parse(), Ok(policy));
        }
    }
}
