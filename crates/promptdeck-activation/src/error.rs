//! Error types for activation tracking.

use thiserror::Error;

/// Errors that can occur during activation operations.
#[derive(Error, Debug)]
pub enum ActivationError {
    /// Active-list index out of range.
    #[error("invalid active index {index} (active count: {len})")]
    InvalidIndex { index: usize, len: usize },
}

/// Result type alias for activation operations.
pub type Result<T> = std::result::Result<T, ActivationError>;
