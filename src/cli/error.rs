//! CLI error type

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;
use crate::export::GenerateError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read {0}: {1}")]
    FileReadError(PathBuf, String),

    #[error("Invalid JSON input: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error(transparent)]
    Generate(#[from] GenerateError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
