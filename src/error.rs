use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0} must be set before generating repository URLs")]
    MissingConfiguration(&'static str),

    #[error("Invalid repository URL format: {0}")]
    InvalidFormat(String),

    #[error("Failed to resolve working directory {}: {source}", path.display())]
    WorkingDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read repository list {}: {source}", path.display())]
    RepositoryList {
        path: PathBuf,
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
