//! CLI error types

use tether_tree::TreeError;
use tether_types::BindError;
use thiserror::Error;

/// CLI error type
#[derive(Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Binding error: {0}")]
    Bind(#[from] BindError),

    #[error("Tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("Invalid manifest: {0}")]
    Manifest(String),
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
