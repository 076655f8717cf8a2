//! Group document store.
//!
//! Group documents live beside the raw source files rather than inside the
//! derived tree, so re-extraction cannot erase saved groups.

use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::Result;
use crate::json::{read_json_optional, write_json};

/// Named groups of body-fragment positions for one preset.
pub type GroupMap = BTreeMap<String, Vec<usize>>;

/// Persists one group document per preset at
/// `<sources>/<preset>_groups.json`.
pub struct GroupStore {
    sources_dir: PathBuf,
}

impl GroupStore {
    /// Creates a new GroupStore beside the given sources directory.
    pub fn new(sources_dir: impl Into<PathBuf>) -> Self {
        Self {
            sources_dir: sources_dir.into(),
        }
    }

    /// Returns the path of a preset's group document.
    fn group_path(&self, preset: &str) -> PathBuf {
        self.sources_dir.join(format!("{}_groups.json", preset))
    }

    /// Loads the group document of a preset, or None if none was saved.
    pub fn load(&self, preset: &str) -> Result<Option<GroupMap>> {
        read_json_optional(&self.group_path(preset))
    }

    /// Saves the group document of a preset.
    pub fn save(&self, preset: &str, groups: &GroupMap) -> Result<()> {
        write_json(&self.group_path(preset), groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_document() {
        let dir = tempdir().unwrap();
        let store = GroupStore::new(dir.path());
        assert!(store.load("demo").unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = GroupStore::new(dir.path());

        let mut groups = GroupMap::new();
        groups.insert("writing".to_string(), vec![0, 2]);
        store.save("demo", &groups).unwrap();

        let loaded = store.load("demo").unwrap().unwrap();
        assert_eq!(loaded, groups);
    }

    #[test]
    fn test_documents_are_per_preset() {
        let dir = tempdir().unwrap();
        let store = GroupStore::new(dir.path());

        let mut groups = GroupMap::new();
        groups.insert("g".to_string(), vec![1]);
        store.save("one", &groups).unwrap();

        assert!(store.load("two").unwrap().is_none());
        assert!(dir.path().join("one_groups.json").exists());
    }
}
