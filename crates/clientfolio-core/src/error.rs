//! Error types for clientfolio-core

use thiserror::Error;

use crate::client::ClientId;
use crate::folder::FolderId;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from store operations.
///
/// Every variant except `Persistence` is raised before any state is touched,
/// so a failed call leaves the collection exactly as it was.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A required field was empty after trimming
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(FolderId),

    #[error("Client not found: {0}")]
    ClientNotFound(ClientId),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Snapshot read/write errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Snapshot was written by a newer schema
    #[error("Unsupported snapshot version: found {found}, supported up to {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Snapshot parsed but breaks an invariant (e.g. duplicate ids)
    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<std::io::Error> for PersistenceError {
    fn from(err: std::io::Error) -> Self {
        PersistenceError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        PersistenceError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::Io(err.to_string())
    }
}
