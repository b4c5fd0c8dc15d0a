use std::{path::PathBuf, process};

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, warn};
use tokio::signal;

use gcn_launch::{
    ExecutionPolicy, InvocationDescriptor, JobCoordinates, LaunchError, Runner, TrainingParameters,
    configs::{DEFAULT_COORDINATOR, json},
    runner::DEFAULT_INTERPRETER,
};

/// Launches the baseline and 1.5D replicated GCN trainers for one participant
/// of a distributed job.
#[derive(Parser, Debug)]
#[command(name = "gcn-launch", version, about, long_about = None)]
struct Cli {
    /// Rank of this process within the job
    #[arg(long, env = "SLURM_PROCID")]
    rank: Option<usize>,

    /// Total number of processes in the job
    #[arg(long, env = "SLURM_NTASKS")]
    world_size: Option<usize>,

    /// Address of the rank 0 rendezvous node
    #[arg(long, default_value = DEFAULT_COORDINATOR)]
    coordinator: String,

    /// JSON file with training parameters; explicit flags take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset to train on
    #[arg(long)]
    graph_name: Option<String>,

    /// Width of the hidden layer
    #[arg(long)]
    hidden_width: Option<usize>,

    /// Replication factor of the 1.5D trainer
    #[arg(long)]
    replication: Option<usize>,

    /// Training epochs [default: 10]
    #[arg(long)]
    epochs: Option<usize>,

    /// torch.distributed backend [default: nccl]
    #[arg(long)]
    dist_backend: Option<String>,

    /// Interpreter used to run the trainer scripts
    #[arg(long, default_value = DEFAULT_INTERPRETER)]
    interpreter: String,

    /// Directory containing the trainer scripts
    #[arg(long)]
    workdir: Option<PathBuf>,

    /// sequential, independent or concurrent
    #[arg(long, default_value_t = ExecutionPolicy::Sequential)]
    policy: ExecutionPolicy,

    /// Print the invocations instead of running them
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn training(&self) -> Result<TrainingParameters, LaunchError> {
        let mut training = match &self.config {
            Some(path) => json::load_training(path)?,
            None => TrainingParameters::new("", 0, 0),
        };

        if let Some(graph_name) = &self.graph_name {
            training.graph_name = graph_name.clone();
        }
        if let Some(hidden_width) = self.hidden_width {
            training.hidden_width = hidden_width;
        }
        if let Some(replication) = self.replication {
            training.replication_factor = replication;
        }
        if let Some(epochs) = self.epochs {
            training.epochs = epochs;
        }
        if let Some(backend) = &self.dist_backend {
            training.dist_backend = backend.clone();
        }

        Ok(training)
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let cli = Cli::parse();

    if let Err(e) = launch(&cli).await {
        error!("{e:#}");
        let code = e
            .downcast_ref::<LaunchError>()
            .map_or(1, LaunchError::exit_code);
        process::exit(code);
    }
}

async fn launch(cli: &Cli) -> Result<()> {
    let job = JobCoordinates::from_scheduler(cli.rank, cli.world_size, cli.coordinator.as_str())
        .context("reading job coordinates")?;
    let training = cli.training().context("reading training parameters")?;
    let descriptors = gcn_launch::plan(&job, &training)?;

    if cli.dry_run {
        for line in dry_run_lines(&descriptors, &cli.interpreter) {
            println!("{line}");
        }
        return Ok(());
    }

    let mut runner = Runner::new()
        .interpreter(cli.interpreter.as_str())
        .policy(cli.policy);
    if let Some(dir) = &cli.workdir {
        runner = runner.working_dir(dir.clone());
    }

    tokio::select! {
        ret = runner.run(&descriptors) => {
            ret?;
            info!("all trainers finished");
            Ok(())
        }
        _ = signal::ctrl_c() => {
            warn!("received SIGINT, stopping trainers");
            Err(LaunchError::Interrupted.into())
        }
    }
}

fn dry_run_lines(descriptors: &[InvocationDescriptor], interpreter: &str) -> Vec<String> {
    descriptors
        .iter()
        .map(|descriptor| descriptor.command_line(interpreter))
        .collect()
}
