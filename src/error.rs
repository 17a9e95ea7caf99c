use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProcessingError>;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration error: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Cannot read partition {}: {source}", path.display())]
    PartitionRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write report {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Collective transfer failed: {0}")]
    Collective(String),

    #[error("Malformed contribution payload: {0}")]
    Wire(#[from] serde_json::Error),

    #[error("Async task error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl ProcessingError {
    /// Rejected configuration. The binary exits with a usage status for these
    /// instead of a runtime failure.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ProcessingError::Config(_)
                | ProcessingError::Settings(_)
                | ProcessingError::Validation(_)
        )
    }
}
