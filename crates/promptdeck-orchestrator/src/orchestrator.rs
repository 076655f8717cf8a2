//! Orchestrator composing the preset, activation and group components.

use std::path::PathBuf;

use promptdeck_activation::ActivationTracker;
use promptdeck_groups::{GroupError, GroupRegistry};
use promptdeck_models::{Fragment, PendingToken};
use promptdeck_persistence::{GroupMap, GroupStore, SnapshotStore};
use promptdeck_presets::{PresetError, PresetStore};
use tracing::{debug, info};

use crate::error::{OrchestratorError, Result};
use crate::pending::{GroupEditMode, PendingKind, PendingRegistry};

/// An outbound model request before injection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutboundRequest {
    /// System-instruction string; the preset prefix is prepended here.
    pub system_instruction: String,
    /// User-content string; active fragments are prepended here.
    pub user_content: String,
}

impl OutboundRequest {
    pub fn new(system_instruction: impl Into<String>, user_content: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            user_content: user_content.into(),
        }
    }
}

/// One row of the fragment listing.
#[derive(Debug, Clone)]
pub struct FragmentEntry {
    /// Position in the current body list.
    pub index: usize,
    pub fragment: Fragment,
    /// Whether the fragment is currently active.
    pub active: bool,
}

/// One resolved member of a group view.
#[derive(Debug, Clone)]
pub struct GroupEntry {
    /// Stored body-list position.
    pub position: usize,
    /// The fragment at that position, or None when the position dangles
    /// past the current body list.
    pub fragment: Option<Fragment>,
    /// Whether that fragment is currently active.
    pub active: bool,
}

/// Counts reported by a refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshStats {
    pub preset_count: usize,
    pub fragment_count: usize,
}

/// Composes the preset store, activation tracker, group registry and
/// pending-input registry behind one management surface, and applies the
/// selected preset to outbound requests.
///
/// Execution is single-threaded request/response: every operation runs to
/// completion before the next, so the orchestrator holds no locks.
pub struct Orchestrator {
    presets: PresetStore,
    tracker: ActivationTracker,
    groups: GroupRegistry,
    pending: PendingRegistry,
    current: String,
}

impl Orchestrator {
    /// Creates an orchestrator over the default data directories.
    pub fn new() -> Result<Self> {
        promptdeck_core::config::ensure_all_dirs()?;
        Self::with_dirs(
            promptdeck_core::config::presets_dir(),
            promptdeck_core::config::extracted_dir(),
        )
    }

    /// Creates an orchestrator over explicit directories.
    ///
    /// Loads the derived tree (extracting first when it is missing or
    /// empty), selects the first preset, loads its group document and
    /// restores its activation snapshot.
    pub fn with_dirs(sources_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let sources_dir = sources_dir.into();
        info!(sources = %sources_dir.display(), "initializing orchestrator");

        let mut orchestrator = Self {
            presets: PresetStore::new(&sources_dir, output_dir),
            tracker: ActivationTracker::with_snapshots(SnapshotStore::new(&sources_dir)),
            groups: GroupRegistry::new(GroupStore::new(&sources_dir)),
            pending: PendingRegistry::new(),
            current: String::new(),
        };

        orchestrator.presets.load()?;
        if let Some(first) = orchestrator.presets.preset_names().into_iter().next() {
            orchestrator.select(&first);
            let restored = orchestrator
                .tracker
                .restore(orchestrator.presets.fragments(&first));
            info!(preset = %first, restored, "selected default preset");
        } else {
            info!("no presets available yet");
        }

        Ok(orchestrator)
    }

    /// Binds all components to a preset.
    fn select(&mut self, preset: &str) {
        self.current = preset.to_string();
        self.tracker.switch(preset);
        self.groups.load(preset);
    }

    fn require_current(&self) -> Result<String> {
        if self.current.is_empty() {
            return Err(OrchestratorError::NoPresetSelected);
        }
        Ok(self.current.clone())
    }

    // Preset surface

    /// Returns the loaded preset names in sorted order.
    pub fn preset_names(&self) -> Vec<String> {
        self.presets.preset_names()
    }

    /// Returns the currently selected preset, if any.
    pub fn current_preset(&self) -> Option<&str> {
        if self.current.is_empty() {
            None
        } else {
            Some(&self.current)
        }
    }

    /// Switches to the preset at `index` in the sorted name list.
    ///
    /// The active set is cleared (no carry-over) and the new preset's
    /// group document is loaded.
    pub fn switch_preset(&mut self, index: usize) -> Result<String> {
        let names = self.presets.preset_names();
        if names.is_empty() {
            return Err(OrchestratorError::NoPresets);
        }
        let name = names
            .get(index)
            .ok_or(OrchestratorError::InvalidPresetIndex(index))?
            .clone();

        self.select(&name);
        info!(preset = %name, "switched preset");
        Ok(name)
    }

    /// Creates a new empty preset and switches to it.
    pub fn create_preset(&mut self, name: &str) -> Result<()> {
        self.presets.create(name)?;
        self.current = name.to_string();
        self.tracker.switch(name);
        self.groups.reset(name);
        Ok(())
    }

    /// Re-extracts the raw sources and reloads everything.
    ///
    /// The active set is cleared and the first preset becomes current
    /// again.
    pub fn refresh(&mut self) -> Result<RefreshStats> {
        self.presets.extract_and_reload()?;

        match self.presets.preset_names().into_iter().next() {
            Some(first) => self.select(&first),
            None => {
                self.current.clear();
                self.tracker.switch("");
                self.groups.reset("");
            }
        }

        let stats = RefreshStats {
            preset_count: self.presets.preset_names().len(),
            fragment_count: self.presets.fragment_count(),
        };
        info!(
            presets = stats.preset_count,
            fragments = stats.fragment_count,
            "refreshed presets"
        );
        Ok(stats)
    }

    // Fragment surface

    /// Lists the current preset's body fragments with active markers.
    pub fn list_fragments(&self) -> Vec<FragmentEntry> {
        self.presets
            .fragments(&self.current)
            .iter()
            .enumerate()
            .map(|(index, fragment)| FragmentEntry {
                index,
                fragment: fragment.clone(),
                active: self.tracker.is_active(&fragment.key),
            })
            .collect()
    }

    /// Returns one body fragment with its active marker.
    pub fn view_fragment(&self, index: usize) -> Result<FragmentEntry> {
        let fragment = self
            .presets
            .fragments(&self.current)
            .get(index)
            .ok_or(OrchestratorError::InvalidFragmentIndex(index))?;
        Ok(FragmentEntry {
            index,
            fragment: fragment.clone(),
            active: self.tracker.is_active(&fragment.key),
        })
    }

    /// Returns the current preset's prefix text.
    pub fn prefix(&self) -> &str {
        self.presets.prefix(&self.current)
    }

    /// Adds a user fragment to the current preset.
    pub fn add_fragment(&mut self, name: &str, content: &str) -> Result<Fragment> {
        let preset = self.require_current()?;
        Ok(self.presets.add_fragment(&preset, name, content)?)
    }

    /// Begins a two-phase fragment addition, to be completed with the
    /// fragment content.
    pub fn begin_add_fragment(&mut self, name: &str) -> Result<PendingToken> {
        self.require_current()?;
        if name.trim().is_empty() {
            return Err(PresetError::Empty("fragment name").into());
        }
        Ok(self.pending.begin(PendingKind::FragmentContent {
            name: name.to_string(),
        }))
    }

    /// Completes a two-phase fragment addition with the collected content.
    pub fn complete_add_fragment(
        &mut self,
        token: &PendingToken,
        content: &str,
    ) -> Result<Fragment> {
        match self.pending.complete(token)? {
            PendingKind::FragmentContent { name } => self.add_fragment(&name, content),
            _ => Err(OrchestratorError::PendingMismatch),
        }
    }

    /// Deletes a user-created fragment and drops it from the active set.
    pub fn delete_fragment(&mut self, index: usize) -> Result<Fragment> {
        let preset = self.require_current()?;
        let removed = self.presets.delete_fragment(&preset, index)?;
        self.tracker.deactivate_by_keys(&[removed.key.clone()]);
        Ok(removed)
    }

    // Activation surface

    /// Activates the body fragment at `index`.
    ///
    /// Returns the newly activated subset: empty when the fragment was
    /// already active.
    pub fn activate_fragment(&mut self, index: usize) -> Result<Vec<Fragment>> {
        self.require_current()?;
        let body = self.presets.fragments(&self.current);
        if index >= body.len() {
            return Err(OrchestratorError::InvalidFragmentIndex(index));
        }
        Ok(self.tracker.activate(body, &[index]))
    }

    /// Activates every member of a named group, best effort.
    ///
    /// An unknown or empty group fails; dangling member positions are
    /// skipped with a warning by the tracker's bounds check.
    pub fn activate_group(&mut self, name: &str) -> Result<Vec<Fragment>> {
        self.require_current()?;
        let indices = self
            .groups
            .get(name)
            .ok_or_else(|| GroupError::NotFound(name.to_string()))?
            .to_vec();
        if indices.is_empty() {
            return Err(GroupError::Empty(name.to_string()).into());
        }

        let body = self.presets.fragments(&self.current);
        let newly = self.tracker.activate(body, &indices);
        debug!(group = %name, newly = newly.len(), "activated group");
        Ok(newly)
    }

    /// Deactivates the active entry at `index`.
    pub fn deactivate_fragment(&mut self, index: usize) -> Result<Fragment> {
        Ok(self.tracker.deactivate(index)?)
    }

    /// Clears the active set, returning the prior count.
    pub fn clear_active(&mut self) -> usize {
        self.tracker.clear()
    }

    /// Returns the ordered active fragments.
    pub fn active_fragments(&self) -> &[Fragment] {
        self.tracker.active()
    }

    // Group surface

    /// Creates a group over the current body list.
    pub fn create_group(&mut self, name: &str, indices: &[usize]) -> Result<Vec<usize>> {
        self.require_current()?;
        let body_len = self.presets.fragments(&self.current).len();
        Ok(self.groups.create(name, indices, body_len)?)
    }

    /// Updates a group over the current body list.
    pub fn update_group(&mut self, name: &str, indices: &[usize]) -> Result<Vec<usize>> {
        self.require_current()?;
        let body_len = self.presets.fragments(&self.current).len();
        Ok(self.groups.update(name, indices, body_len)?)
    }

    /// Deletes a group.
    pub fn delete_group(&mut self, name: &str) -> Result<()> {
        self.require_current()?;
        Ok(self.groups.delete(name)?)
    }

    /// Returns all groups of the current preset.
    pub fn groups(&self) -> &GroupMap {
        self.groups.all()
    }

    /// Resolves a group's members against the current body list.
    pub fn group_entries(&self, name: &str) -> Result<Vec<GroupEntry>> {
        let indices = self
            .groups
            .get(name)
            .ok_or_else(|| GroupError::NotFound(name.to_string()))?;

        let body = self.presets.fragments(&self.current);
        Ok(indices
            .iter()
            .map(|&position| {
                let fragment = body.get(position).cloned();
                let active = fragment
                    .as_ref()
                    .map(|f| self.tracker.is_active(&f.key))
                    .unwrap_or(false);
                GroupEntry {
                    position,
                    fragment,
                    active,
                }
            })
            .collect())
    }

    /// Begins a two-phase group creation, to be completed with the index
    /// list.
    pub fn begin_create_group(&mut self, name: &str) -> Result<PendingToken> {
        self.require_current()?;
        if name.trim().is_empty() {
            return Err(GroupError::EmptyName.into());
        }
        Ok(self.pending.begin(PendingKind::GroupIndices {
            group: name.to_string(),
            mode: GroupEditMode::Create,
        }))
    }

    /// Begins a two-phase group update, to be completed with the index
    /// list. The group must already exist.
    pub fn begin_update_group(&mut self, name: &str) -> Result<PendingToken> {
        self.require_current()?;
        if self.groups.get(name).is_none() {
            return Err(GroupError::NotFound(name.to_string()).into());
        }
        Ok(self.pending.begin(PendingKind::GroupIndices {
            group: name.to_string(),
            mode: GroupEditMode::Update,
        }))
    }

    /// Completes a two-phase group create/update with the collected index
    /// list.
    pub fn complete_group_indices(
        &mut self,
        token: &PendingToken,
        indices: &[usize],
    ) -> Result<Vec<usize>> {
        match self.pending.complete(token)? {
            PendingKind::GroupIndices { group, mode } => match mode {
                GroupEditMode::Create => self.create_group(&group, indices),
                GroupEditMode::Update => self.update_group(&group, indices),
            },
            _ => Err(OrchestratorError::PendingMismatch),
        }
    }

    // Request surface

    /// Applies the selected preset to an outbound request: the prefix text
    /// is prepended to the system instruction, then the active fragments'
    /// content is prepended to the user content, both blank-line
    /// separated. A request is left untouched when there is nothing to
    /// inject.
    pub fn apply_to_request(&self, request: &mut OutboundRequest) {
        let prefix = self.presets.prefix(&self.current);
        if !prefix.is_empty() {
            if request.system_instruction.is_empty() {
                request.system_instruction = prefix.to_string();
            } else {
                request.system_instruction =
                    format!("{}\n\n{}", prefix, request.system_instruction);
            }
        }

        if !self.tracker.is_empty() {
            let injected: Vec<&str> = self
                .tracker
                .active()
                .iter()
                .map(|f| f.content.as_str())
                .collect();
            let injected = injected.join("\n\n");
            if request.user_content.is_empty() {
                request.user_content = injected;
            } else {
                request.user_content = format!("{}\n\n{}", injected, request.user_content);
            }
        }
    }
}
