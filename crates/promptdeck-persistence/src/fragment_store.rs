//! Fragment store for the derived preset tree.

use std::fs;
use std::path::PathBuf;

use promptdeck_models::{slugify, Fragment};
use tracing::warn;

use crate::error::{PersistenceError, Result};
use crate::json::{read_json, write_json};

/// Reserved filename for the merged prefix record of a preset.
pub const PREFIX_FILE: &str = "prompt_prefix.json";

/// Manages the derived fragment tree produced by extraction.
///
/// Fragments are stored as individual JSON records organized by preset:
/// ```text
/// root/
/// ├── MyPreset/
/// │   ├── Main_Prompt.json
/// │   ├── user_My_Style.json
/// │   └── prompt_prefix.json
/// └── Another/
///     └── Rules.json
/// ```
pub struct FragmentStore {
    root: PathBuf,
}

impl FragmentStore {
    /// Creates a new FragmentStore rooted at the derived-tree directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the derived-tree root.
    pub fn root(&self) -> &PathBuf {
        &self.root
    }

    /// Returns the directory of a preset.
    pub fn preset_dir(&self, preset: &str) -> PathBuf {
        self.root.join(preset)
    }

    /// Returns the path of a fragment record.
    fn fragment_path(&self, preset: &str, slug: &str) -> PathBuf {
        self.preset_dir(preset).join(format!("{}.json", slug))
    }

    /// Ensures a preset directory exists.
    fn ensure_preset_dir(&self, preset: &str) -> Result<()> {
        let dir = self.preset_dir(preset);
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| PersistenceError::DirectoryError {
                path: dir,
                source,
            })?;
        }
        Ok(())
    }

    /// Creates a preset directory, failing if it already exists.
    ///
    /// Re-creating would invite silently clobbering user records, so the
    /// caller gets an `AlreadyExists` error instead.
    pub fn create_preset_dir(&self, preset: &str) -> Result<()> {
        let dir = self.preset_dir(preset);
        if dir.exists() {
            return Err(PersistenceError::AlreadyExists {
                kind: "preset".to_string(),
                id: preset.to_string(),
            });
        }
        fs::create_dir_all(&dir).map_err(|source| PersistenceError::DirectoryError {
            path: dir,
            source,
        })
    }

    /// Saves a body-fragment record, returning the slug it was written
    /// under.
    pub fn save_fragment(&self, preset: &str, fragment: &Fragment) -> Result<String> {
        self.ensure_preset_dir(preset)?;
        let slug = fragment
            .slug
            .clone()
            .unwrap_or_else(|| slugify(&fragment.name));
        let path = self.fragment_path(preset, &slug);
        write_json(&path, fragment)?;
        Ok(slug)
    }

    /// Saves the merged prefix record of a preset at the reserved filename.
    pub fn save_prefix(&self, preset: &str, fragment: &Fragment) -> Result<()> {
        self.ensure_preset_dir(preset)?;
        let path = self.preset_dir(preset).join(PREFIX_FILE);
        write_json(&path, fragment)
    }

    /// Lists preset directory names (immediate subdirectories), sorted.
    ///
    /// A missing root is not an error; it just holds no presets yet.
    pub fn list_presets(&self) -> Result<Vec<String>> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        let entries = fs::read_dir(&self.root).map_err(|source| PersistenceError::ReadError {
            path: self.root.clone(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| PersistenceError::ReadError {
                path: self.root.clone(),
                source,
            })?;
            if entry.path().is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// Reads every fragment record of a preset in filename order.
    ///
    /// Returns `(file name, fragment)` pairs so the caller can recognize
    /// the reserved prefix filename. Unreadable records are skipped with a
    /// warning; siblings still load.
    pub fn read_fragments(&self, preset: &str) -> Result<Vec<(String, Fragment)>> {
        let dir = self.preset_dir(preset);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut paths = Vec::new();
        let entries = fs::read_dir(&dir).map_err(|source| PersistenceError::ReadError {
            path: dir.clone(),
            source,
        })?;
        for entry in entries {
            let entry = entry.map_err(|source| PersistenceError::ReadError {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut records = Vec::new();
        for path in paths {
            match read_json::<Fragment>(&path) {
                Ok(fragment) => {
                    let file_name = path
                        .file_name()
                        .and_then(|s| s.to_str())
                        .unwrap_or_default()
                        .to_string();
                    records.push((file_name, fragment));
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable fragment record");
                }
            }
        }

        Ok(records)
    }

    /// Deletes a fragment record by slug.
    ///
    /// Returns true if a file was removed; a missing file is not an error.
    pub fn delete_fragment(&self, preset: &str, slug: &str) -> Result<bool> {
        let path = self.fragment_path(preset, slug);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .map_err(|source| PersistenceError::WriteError { path, source })?;
        Ok(true)
    }
}
