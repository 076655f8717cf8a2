//! Activation snapshot store.
//!
//! Snapshots record which fragments of a preset were active, keyed by
//! display name so they can be re-associated with freshly loaded fragment
//! objects after a reload. They live beside the raw sources, like group
//! documents.

use std::path::PathBuf;

use promptdeck_models::ActivationRecord;

use crate::error::Result;
use crate::json::{read_json_optional, write_json};

/// Persists one activation snapshot per preset at
/// `<sources>/<preset>_activation.json`.
pub struct SnapshotStore {
    sources_dir: PathBuf,
}

impl SnapshotStore {
    /// Creates a new SnapshotStore beside the given sources directory.
    pub fn new(sources_dir: impl Into<PathBuf>) -> Self {
        Self {
            sources_dir: sources_dir.into(),
        }
    }

    /// Returns the path of a preset's snapshot file.
    fn snapshot_path(&self, preset: &str) -> PathBuf {
        self.sources_dir.join(format!("{}_activation.json", preset))
    }

    /// Loads the snapshot of a preset, or None if none was saved.
    pub fn load(&self, preset: &str) -> Result<Option<Vec<ActivationRecord>>> {
        read_json_optional(&self.snapshot_path(preset))
    }

    /// Saves the snapshot of a preset.
    pub fn save(&self, preset: &str, records: &[ActivationRecord]) -> Result<()> {
        write_json(&self.snapshot_path(preset), &records)
    }
}
