use std::{fs, path::Path};

use super::TrainingParameters;
use crate::error::Result;

/// Loads [`TrainingParameters`] from a JSON file.
///
/// `epochs` and `dist_backend` fall back to their defaults when absent.
///
/// # Errors
/// Returns `LaunchError::Io` if the file cannot be read and `LaunchError::Parse`
/// if it is not a valid parameters object.
pub fn load_training<P: AsRef<Path>>(path: P) -> Result<TrainingParameters> {
    let path = path.as_ref();
    log::debug!("loading training parameters from {}", path.display());

    let content = fs::read_to_string(path)?;
    parse_training(&content)
}

/// Parses [`TrainingParameters`] from a JSON string.
pub fn parse_training(content: &str) -> Result<TrainingParameters> {
    Ok(serde_json::from_str(content)?)
}
