use serde::Deserialize;

/// Epochs run by each trainer unless overridden.
pub const DEFAULT_EPOCHS: usize = 10;

/// Accelerators driven by each participant.
pub const DEVICES_PER_NODE: usize = 2;

/// Repetitions of the training run inside one trainer invocation.
pub const RUN_COUNT: usize = 1;

/// Collective backend handed to `torch.distributed`.
pub const DEFAULT_DIST_BACKEND: &str = "nccl";

/// Caller-supplied parameters shared by both trainer invocations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TrainingParameters {
    pub graph_name: String,
    pub hidden_width: usize,
    /// Only forwarded to the replicated trainer.
    pub replication_factor: usize,
    #[serde(default = "default_epochs")]
    pub epochs: usize,
    #[serde(default = "default_dist_backend")]
    pub dist_backend: String,
}

impl TrainingParameters {
    pub fn new(graph_name: impl Into<String>, hidden_width: usize, replication_factor: usize) -> Self {
        Self {
            graph_name: graph_name.into(),
            hidden_width,
            replication_factor,
            epochs: DEFAULT_EPOCHS,
            dist_backend: default_dist_backend(),
        }
    }

    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.epochs = epochs;
        self
    }

    pub fn with_dist_backend(mut self, backend: impl Into<String>) -> Self {
        self.dist_backend = backend.into();
        self
    }

    /// Per-node device count. Not configurable: every participant must agree on it.
    pub fn devices_per_node(&self) -> usize {
        DEVICES_PER_NODE
    }
}

fn default_epochs() -> usize {
    DEFAULT_EPOCHS
}

fn default_dist_backend() -> String {
    DEFAULT_DIST_BACKEND.to_string()
}
