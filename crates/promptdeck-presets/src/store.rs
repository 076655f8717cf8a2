//! Preset repository: loads the derived tree and owns all preset mutation.

use std::collections::BTreeMap;
use std::path::PathBuf;

use promptdeck_models::{slugify, Fragment, Preset};
use promptdeck_persistence::{FragmentStore, PersistenceError, PREFIX_FILE};
use promptdeck_extract::{ExtractSummary, Extractor};
use tracing::{debug, info, warn};

use crate::error::{PresetError, Result};

/// Repository over the derived fragment tree.
///
/// Holds every loaded preset in memory and exposes the only mutation
/// methods for them; no other component reaches into a preset's fragment
/// list. Loading triggers extraction when the derived tree is missing or
/// empty.
pub struct PresetStore {
    sources_dir: PathBuf,
    store: FragmentStore,
    presets: BTreeMap<String, Preset>,
}

impl PresetStore {
    /// Creates a new PresetStore over the given sources directory and
    /// derived-tree root.
    pub fn new(sources_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            sources_dir: sources_dir.into(),
            store: FragmentStore::new(output_dir),
            presets: BTreeMap::new(),
        }
    }

    /// Runs extraction over the raw sources.
    pub fn extract(&self) -> Result<ExtractSummary> {
        let extractor = Extractor::new(&self.sources_dir, self.store.root());
        Ok(extractor.extract_all()?)
    }

    /// Loads every preset from the derived tree, replacing the in-memory
    /// state.
    ///
    /// When the tree is missing or holds no preset directories, extraction
    /// runs first and the tree is re-scanned. Returns the number of preset
    /// directories that yielded a non-empty load; empty directories are
    /// skipped with a warning.
    pub fn load(&mut self) -> Result<usize> {
        self.presets.clear();

        let mut names = self.store.list_presets()?;
        if names.is_empty() {
            info!("derived tree missing or empty, running extraction");
            self.extract()?;
            names = self.store.list_presets()?;
        }

        for name in names {
            let records = self.store.read_fragments(&name)?;
            if records.is_empty() {
                warn!(preset = %name, "skipping empty preset directory");
                continue;
            }

            let mut preset = Preset::new(&name);
            let mut prefix_seen = false;
            for (file_name, fragment) in records {
                if fragment.is_prefix || file_name == PREFIX_FILE {
                    if prefix_seen {
                        warn!(
                            preset = %name,
                            file = %file_name,
                            "ignoring additional prefix record"
                        );
                        continue;
                    }
                    prefix_seen = true;
                    preset.set_prefix(fragment.content);
                    continue;
                }

                if fragment.is_blank() {
                    debug!(preset = %name, file = %file_name, "dropping blank fragment");
                    continue;
                }
                preset.push_fragment(fragment);
            }

            preset.sort_by_name();
            info!(preset = %name, fragments = preset.len(), "loaded preset");
            self.presets.insert(name, preset);
        }

        Ok(self.presets.len())
    }

    /// Returns the loaded preset names in sorted order.
    pub fn preset_names(&self) -> Vec<String> {
        self.presets.keys().cloned().collect()
    }

    /// Returns a preset by name.
    pub fn get(&self, name: &str) -> Option<&Preset> {
        self.presets.get(name)
    }

    /// Returns the body fragments of a preset, or an empty slice for an
    /// unknown name.
    pub fn fragments(&self, name: &str) -> &[Fragment] {
        self.presets.get(name).map(Preset::fragments).unwrap_or(&[])
    }

    /// Returns the prefix text of a preset, or an empty string for an
    /// unknown name.
    pub fn prefix(&self, name: &str) -> &str {
        self.presets.get(name).map(Preset::prefix).unwrap_or("")
    }

    /// Creates a new empty preset.
    ///
    /// Fails if the preset directory already exists; re-creating would
    /// silently clobber existing user records.
    pub fn create(&mut self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(PresetError::Empty("preset name"));
        }

        match self.store.create_preset_dir(name) {
            Ok(()) => {}
            Err(PersistenceError::AlreadyExists { .. }) => {
                return Err(PresetError::AlreadyExists(name.to_string()));
            }
            Err(e) => return Err(e.into()),
        }

        self.presets.insert(name.to_string(), Preset::new(name));
        info!(preset = %name, "created preset");
        Ok(())
    }

    /// Adds a user-authored fragment to a preset.
    ///
    /// The record is written first; only a successful write mutates the
    /// in-memory body list. The fragment is appended at the end, keeping
    /// existing positions stable.
    pub fn add_fragment(&mut self, preset: &str, name: &str, content: &str) -> Result<Fragment> {
        if name.trim().is_empty() {
            return Err(PresetError::Empty("fragment name"));
        }
        if content.trim().is_empty() {
            return Err(PresetError::Empty("fragment content"));
        }
        if !self.presets.contains_key(preset) {
            return Err(PresetError::UnknownPreset(preset.to_string()));
        }

        let fragment = Fragment::user(name, content);
        self.store.save_fragment(preset, &fragment)?;

        let entry = self
            .presets
            .get_mut(preset)
            .expect("preset presence checked above");
        entry.push_fragment(fragment.clone());

        info!(preset = %preset, fragment = %name, "added user fragment");
        Ok(fragment)
    }

    /// Deletes a user-created fragment by body-list index.
    ///
    /// Fails with no mutation when the index is out of range or the
    /// fragment was extracted rather than user-created. The on-disk record
    /// is located by the slug persisted at creation time; a missing file
    /// is tolerated.
    pub fn delete_fragment(&mut self, preset: &str, index: usize) -> Result<Fragment> {
        let entry = self
            .presets
            .get_mut(preset)
            .ok_or_else(|| PresetError::UnknownPreset(preset.to_string()))?;

        let fragment = entry
            .fragment(index)
            .ok_or(PresetError::InvalidIndex(index))?;
        if !fragment.user_created {
            return Err(PresetError::NotUserCreated(fragment.name.clone()));
        }

        let slug = fragment
            .slug
            .clone()
            .unwrap_or_else(|| format!("user_{}", slugify(&fragment.name)));
        if !self.store.delete_fragment(preset, &slug)? {
            warn!(preset = %preset, slug = %slug, "fragment record file not found");
        }

        let removed = entry
            .remove_fragment(index)
            .expect("index bounds checked above");
        info!(preset = %preset, fragment = %removed.name, "deleted user fragment");
        Ok(removed)
    }

    /// Re-extracts the raw sources and reloads the tree.
    ///
    /// User-created records survive because extraction only rewrites
    /// extracted records.
    pub fn extract_and_reload(&mut self) -> Result<usize> {
        self.extract()?;
        self.load()
    }

    /// Total number of body fragments across loaded presets.
    pub fn fragment_count(&self) -> usize {
        self.presets.values().map(Preset::len).sum()
    }
}
