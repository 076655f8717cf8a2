//! Named index-set registry for one preset.

use std::collections::HashSet;

use promptdeck_persistence::{GroupMap, GroupStore};
use tracing::{info, warn};

use crate::error::{GroupError, Result};

/// Registry of named fragment groups for the currently selected preset.
///
/// Groups map a name to an ordered, de-duplicated list of positions into
/// the preset's body list. Positions are validated against the body length
/// at create/update time only; resolution to fragments happens at
/// activation time, which bounds-checks again.
///
/// Mutations persist the whole document before committing to memory, so a
/// failed write leaves the in-memory registry unchanged.
pub struct GroupRegistry {
    store: GroupStore,
    preset: String,
    groups: GroupMap,
}

impl GroupRegistry {
    /// Creates a registry backed by the given store.
    pub fn new(store: GroupStore) -> Self {
        Self {
            store,
            preset: String::new(),
            groups: GroupMap::new(),
        }
    }

    /// Returns the preset this registry is bound to.
    pub fn preset(&self) -> &str {
        &self.preset
    }

    /// Loads the group document of a preset, replacing the in-memory map.
    ///
    /// A missing document yields an empty registry; an unreadable one is
    /// logged and likewise yields an empty registry rather than failing
    /// the preset switch.
    pub fn load(&mut self, preset: &str) -> usize {
        self.preset = preset.to_string();
        self.groups = match self.store.load(preset) {
            Ok(Some(groups)) => groups,
            Ok(None) => GroupMap::new(),
            Err(e) => {
                warn!(preset = %preset, error = %e, "failed to load group document");
                GroupMap::new()
            }
        };
        self.groups.len()
    }

    /// Clears the in-memory map without touching disk (used when a brand
    /// new preset becomes current).
    pub fn reset(&mut self, preset: &str) {
        self.preset = preset.to_string();
        self.groups.clear();
    }

    /// Creates a group from the given body-list positions.
    ///
    /// Invalid positions are dropped with a warning; creation fails only
    /// when no position survives. Returns the stored positions.
    pub fn create(&mut self, name: &str, indices: &[usize], body_len: usize) -> Result<Vec<usize>> {
        if name.trim().is_empty() {
            return Err(GroupError::EmptyName);
        }
        if self.groups.contains_key(name) {
            return Err(GroupError::AlreadyExists(name.to_string()));
        }

        let valid = validate_indices(indices, body_len);
        if valid.is_empty() {
            return Err(GroupError::NoValidIndices);
        }

        let mut next = self.groups.clone();
        next.insert(name.to_string(), valid.clone());
        self.store.save(&self.preset, &next)?;
        self.groups = next;

        info!(preset = %self.preset, group = %name, members = valid.len(), "created group");
        Ok(valid)
    }

    /// Replaces the positions of an existing group.
    ///
    /// Unlike `create`, an all-invalid position list is permitted and
    /// yields an empty group.
    pub fn update(&mut self, name: &str, indices: &[usize], body_len: usize) -> Result<Vec<usize>> {
        if !self.groups.contains_key(name) {
            return Err(GroupError::NotFound(name.to_string()));
        }

        let valid = validate_indices(indices, body_len);

        let mut next = self.groups.clone();
        next.insert(name.to_string(), valid.clone());
        self.store.save(&self.preset, &next)?;
        self.groups = next;

        info!(preset = %self.preset, group = %name, members = valid.len(), "updated group");
        Ok(valid)
    }

    /// Deletes a group.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        if !self.groups.contains_key(name) {
            return Err(GroupError::NotFound(name.to_string()));
        }

        let mut next = self.groups.clone();
        next.remove(name);
        self.store.save(&self.preset, &next)?;
        self.groups = next;

        info!(preset = %self.preset, group = %name, "deleted group");
        Ok(())
    }

    /// Returns the positions of a group.
    pub fn get(&self, name: &str) -> Option<&[usize]> {
        self.groups.get(name).map(Vec::as_slice)
    }

    /// Returns all groups of the bound preset.
    pub fn all(&self) -> &GroupMap {
        &self.groups
    }

    /// Returns the number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Returns true if the registry has no groups.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Keeps in-range positions, de-duplicated, preserving first occurrence.
fn validate_indices(indices: &[usize], body_len: usize) -> Vec<usize> {
    let mut seen = HashSet::new();
    let mut valid = Vec::new();
    for &index in indices {
        if index >= body_len {
            warn!(index, body_len, "skipping invalid fragment index");
            continue;
        }
        if seen.insert(index) {
            valid.push(index);
        }
    }
    valid
}
