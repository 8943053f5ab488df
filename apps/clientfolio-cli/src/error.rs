//! CLI error type

use clientfolio_core::{ConfigError, StoreError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Store(#[from] StoreError),

    #[error("No folder matches '{0}'")]
    FolderNotFound(String),

    #[error("More than one folder is named '{0}'; use the folder id instead")]
    AmbiguousFolder(String),

    #[error("No client with id '{0}'")]
    ClientNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
