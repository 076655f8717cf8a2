//! Error types for preset operations.

use promptdeck_extract::ExtractError;
use promptdeck_persistence::PersistenceError;
use thiserror::Error;

/// Errors that can occur during preset operations.
#[derive(Error, Debug)]
pub enum PresetError {
    /// Preset is not loaded.
    #[error("preset not found: {0}")]
    UnknownPreset(String),

    /// Preset already exists on disk.
    #[error("preset already exists: {0}")]
    AlreadyExists(String),

    /// A required field was empty.
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// Fragment index out of range.
    #[error("invalid fragment index: {0}")]
    InvalidIndex(usize),

    /// Only user-created fragments can be deleted.
    #[error("fragment '{0}' was not created by the user")]
    NotUserCreated(String),

    /// Persistence error.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Extraction error.
    #[error("extraction error: {0}")]
    Extract(#[from] ExtractError),
}

/// Result type alias for preset operations.
pub type Result<T> = std::result::Result<T, PresetError>;
