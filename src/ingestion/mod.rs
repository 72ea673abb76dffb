pub mod cache;
pub mod description;

use thiserror::Error;

use crate::structures::ConfigError;

#[derive(Debug, Error)]
pub enum IngestionError {
    #[error("Failed to read network description: {0}")]
    Read(#[from] std::io::Error),
    #[error("Failed to parse network description: {0}")]
    Parse(#[from] serde_yml::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Remote download not yet implemented: {0}")]
    RemoteUnsupported(String),
    #[error("Invalid routing settings: {0}")]
    InvalidRoutingSettings(String),
}
