//! Error types for orchestration.

use promptdeck_activation::ActivationError;
use promptdeck_groups::GroupError;
use promptdeck_presets::PresetError;
use thiserror::Error;

/// Errors surfaced at the operation boundary.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// No presets are loaded at all.
    #[error("no presets available")]
    NoPresets,

    /// No preset is currently selected.
    #[error("no preset selected")]
    NoPresetSelected,

    /// Preset index out of range.
    #[error("invalid preset index: {0}")]
    InvalidPresetIndex(usize),

    /// Body-fragment index out of range.
    #[error("invalid fragment index: {0}")]
    InvalidFragmentIndex(usize),

    /// Pending-input token unknown (never issued or already consumed).
    #[error("no pending operation for this token")]
    PendingNotFound,

    /// Pending-input token passed its deadline; the operation was
    /// abandoned with no partial commit.
    #[error("pending operation expired")]
    PendingExpired,

    /// Pending-input token belongs to a different kind of operation.
    #[error("token does not match the pending operation")]
    PendingMismatch,

    /// Preset error.
    #[error(transparent)]
    Preset(#[from] PresetError),

    /// Activation error.
    #[error(transparent)]
    Activation(#[from] ActivationError),

    /// Group error.
    #[error(transparent)]
    Group(#[from] GroupError),

    /// Directory bootstrap error.
    #[error("failed to prepare data directories: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for orchestrator operations.
pub type Result<T> = std::result::Result<T, OrchestratorError>;
