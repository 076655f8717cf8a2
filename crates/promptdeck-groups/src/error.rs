//! Error types for group operations.

use promptdeck_persistence::PersistenceError;
use thiserror::Error;

/// Errors that can occur during group operations.
#[derive(Error, Debug)]
pub enum GroupError {
    /// Group name was empty.
    #[error("group name cannot be empty")]
    EmptyName,

    /// A group with this name already exists.
    #[error("group already exists: {0}")]
    AlreadyExists(String),

    /// No group with this name.
    #[error("group not found: {0}")]
    NotFound(String),

    /// No index survived validation at group creation.
    #[error("no valid fragment index")]
    NoValidIndices,

    /// Group resolves to nothing at activation time.
    #[error("group '{0}' is empty")]
    Empty(String),

    /// Persistence error.
    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Result type alias for group operations.
pub type Result<T> = std::result::Result<T, GroupError>;
