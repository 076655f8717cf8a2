//! Active-fragment tracking for the currently selected preset.

use promptdeck_models::{ActivationRecord, Fragment, FragmentKey};
use promptdeck_persistence::SnapshotStore;
use tracing::{debug, warn};

use crate::error::{ActivationError, Result};

/// Tracks the ordered set of fragments injected into outbound requests.
///
/// The tracker is scoped to exactly one preset at a time; switching
/// presets clears the active list with no carry-over. Membership is by
/// `FragmentKey`, so re-activating a fragment is a no-op rather than a
/// duplicate.
///
/// When constructed with a `SnapshotStore`, every mutation persists a
/// name→active table for the bound preset so activation can be restored
/// after a process restart. Snapshot writes are best effort; a failed
/// write is logged and never fails the operation.
pub struct ActivationTracker {
    active: Vec<Fragment>,
    preset: String,
    snapshots: Option<SnapshotStore>,
}

impl ActivationTracker {
    /// Creates a tracker without durable snapshots.
    pub fn new() -> Self {
        Self {
            active: Vec::new(),
            preset: String::new(),
            snapshots: None,
        }
    }

    /// Creates a tracker that persists activation snapshots.
    pub fn with_snapshots(store: SnapshotStore) -> Self {
        Self {
            active: Vec::new(),
            preset: String::new(),
            snapshots: Some(store),
        }
    }

    /// Returns the preset this tracker is bound to.
    pub fn preset(&self) -> &str {
        &self.preset
    }

    /// Binds the tracker to a preset, clearing the active list.
    pub fn switch(&mut self, preset: &str) {
        self.active.clear();
        self.preset = preset.to_string();
    }

    /// Returns the ordered active fragments.
    pub fn active(&self) -> &[Fragment] {
        &self.active
    }

    /// Returns the number of active fragments.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Returns true if nothing is active.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Returns true if the fragment with this key is active.
    pub fn is_active(&self, key: &FragmentKey) -> bool {
        self.active.iter().any(|f| &f.key == key)
    }

    /// Activates the body fragments at the given indices.
    ///
    /// Out-of-range indices are skipped with a warning and never abort the
    /// batch; fragments that are already active are skipped silently.
    /// Returns the newly activated clones in request order.
    pub fn activate(&mut self, body: &[Fragment], indices: &[usize]) -> Vec<Fragment> {
        let mut newly = Vec::new();

        for &index in indices {
            let Some(fragment) = body.get(index) else {
                warn!(index, body_len = body.len(), "skipping invalid fragment index");
                continue;
            };
            if self.is_active(&fragment.key) {
                debug!(name = %fragment.name, "fragment already active");
                continue;
            }
            self.active.push(fragment.clone());
            newly.push(fragment.clone());
        }

        if !newly.is_empty() {
            self.persist();
        }
        newly
    }

    /// Deactivates the active entry at `index` and returns it.
    pub fn deactivate(&mut self, index: usize) -> Result<Fragment> {
        if index >= self.active.len() {
            return Err(ActivationError::InvalidIndex {
                index,
                len: self.active.len(),
            });
        }
        let removed = self.active.remove(index);
        self.persist();
        Ok(removed)
    }

    /// Deactivates every active entry whose key matches.
    ///
    /// Removal proceeds in reverse index order so positions still to be
    /// processed don't shift; the removed fragments are returned in their
    /// original left-to-right order.
    pub fn deactivate_by_keys(&mut self, keys: &[FragmentKey]) -> Vec<Fragment> {
        let matches: Vec<usize> = self
            .active
            .iter()
            .enumerate()
            .filter(|(_, f)| keys.contains(&f.key))
            .map(|(i, _)| i)
            .collect();

        let mut removed = Vec::with_capacity(matches.len());
        for &index in matches.iter().rev() {
            removed.push(self.active.remove(index));
        }
        removed.reverse();

        if !removed.is_empty() {
            self.persist();
        }
        removed
    }

    /// Clears the active list and returns the prior count.
    pub fn clear(&mut self) -> usize {
        let count = self.active.len();
        self.active.clear();
        self.persist();
        count
    }

    /// Restores activation from the bound preset's snapshot.
    ///
    /// Re-association is by display name: a body fragment is re-activated
    /// when its name appears in the snapshot with `active: true`, so a
    /// renamed fragment silently loses its active status. Returns the
    /// number of fragments restored.
    pub fn restore(&mut self, body: &[Fragment]) -> usize {
        let Some(store) = &self.snapshots else {
            return 0;
        };
        if self.preset.is_empty() {
            return 0;
        }

        let records = match store.load(&self.preset) {
            Ok(Some(records)) => records,
            Ok(None) => return 0,
            Err(e) => {
                warn!(preset = %self.preset, error = %e, "failed to load activation snapshot");
                return 0;
            }
        };

        let indices: Vec<usize> = records
            .iter()
            .filter(|r| r.active)
            .filter_map(|r| body.iter().position(|f| f.name == r.name))
            .collect();

        self.activate(body, &indices).len()
    }

    /// Persists the current activation table for the bound preset.
    fn persist(&self) {
        let Some(store) = &self.snapshots else {
            return;
        };
        if self.preset.is_empty() {
            return;
        }

        let records: Vec<ActivationRecord> = self
            .active
            .iter()
            .map(|f| ActivationRecord::new(f.name.clone(), true))
            .collect();
        if let Err(e) = store.save(&self.preset, &records) {
            warn!(preset = %self.preset, error = %e, "failed to persist activation snapshot");
        }
    }
}

impl Default for ActivationTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn body() -> Vec<Fragment> {
        vec![
            Fragment::extracted("Alpha", "alpha text", "a"),
            Fragment::extracted("Beta", "beta text", "b"),
            Fragment::extracted("Gamma", "gamma text", "c"),
        ]
    }

    #[test]
    fn test_activate_returns_newly_in_request_order() {
        let mut tracker = ActivationTracker::new();
        tracker.switch("demo");
        let body = body();

        let newly = tracker.activate(&body, &[2, 0]);

        let names: Vec<&str> = newly.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Gamma", "Alpha"]);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_activate_skips_out_of_range() {
        let mut tracker = ActivationTracker::new();
        tracker.switch("demo");
        let body = body();

        let newly = tracker.activate(&body, &[0, 99, 1]);

        assert_eq!(newly.len(), 2);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_reactivation_is_a_noop() {
        let mut tracker = ActivationTracker::new();
        tracker.switch("demo");
        let body = body();

        tracker.activate(&body, &[0]);
        let again = tracker.activate(&body, &[0]);

        assert!(again.is_empty());
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_no_duplicate_active_entries() {
        let mut tracker = ActivationTracker::new();
        tracker.switch("demo");
        let body = body();

        tracker.activate(&body, &[0, 0, 1, 0]);

        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_deactivate_by_index() {
        let mut tracker = ActivationTracker::new();
        tracker.switch("demo");
        let body = body();
        tracker.activate(&body, &[0, 1]);

        let removed = tracker.deactivate(0).unwrap();

        assert_eq!(removed.name, "Alpha");
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.active()[0].name, "Beta");
    }

    #[test]
    fn test_deactivate_out_of_range() {
        let mut tracker = ActivationTracker::new();
        tracker.switch("demo");

        let result = tracker.deactivate(0);
        assert!(matches!(
            result,
            Err(ActivationError::InvalidIndex { index: 0, len: 0 })
        ));
    }

    #[test]
    fn test_deactivate_by_keys_returns_original_order() {
        let mut tracker = ActivationTracker::new();
        tracker.switch("demo");
        let body = body();
        tracker.activate(&body, &[0, 1, 2]);

        let keys = vec![body[2].key.clone(), body[0].key.clone()];
        let removed = tracker.deactivate_by_keys(&keys);

        let names: Vec<&str> = removed.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Gamma"]);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.active()[0].name, "Beta");
    }

    #[test]
    fn test_deactivate_by_keys_unknown_key() {
        let mut tracker = ActivationTracker::new();
        tracker.switch("demo");
        let body = body();
        tracker.activate(&body, &[0]);

        let removed = tracker.deactivate_by_keys(&[FragmentKey::new()]);

        assert!(removed.is_empty());
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_clear_returns_prior_count() {
        let mut tracker = ActivationTracker::new();
        tracker.switch("demo");
        let body = body();
        tracker.activate(&body, &[0, 1]);

        assert_eq!(tracker.clear(), 2);
        assert!(tracker.is_empty());
        assert_eq!(tracker.clear(), 0);
    }

    #[test]
    fn test_switch_clears_active_set() {
        let mut tracker = ActivationTracker::new();
        tracker.switch("p1");
        let body = body();
        tracker.activate(&body, &[0, 1]);

        tracker.switch("p2");

        assert_eq!(tracker.len(), 0);
        assert_eq!(tracker.preset(), "p2");
    }

    #[test]
    fn test_snapshot_restore_by_name() {
        let dir = tempdir().unwrap();
        let body = body();

        {
            let mut tracker =
                ActivationTracker::with_snapshots(SnapshotStore::new(dir.path()));
            tracker.switch("demo");
            tracker.activate(&body, &[0, 2]);
        }

        // Fresh tracker and freshly "loaded" fragments with new keys.
        let reloaded: Vec<Fragment> = body
            .iter()
            .map(|f| Fragment::extracted(&f.name, &f.content, &f.identifier))
            .collect();

        let mut tracker = ActivationTracker::with_snapshots(SnapshotStore::new(dir.path()));
        tracker.switch("demo");
        let restored = tracker.restore(&reloaded);

        assert_eq!(restored, 2);
        let names: Vec<&str> = tracker.active().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Gamma"]);
    }

    #[test]
    fn test_snapshot_renamed_fragment_loses_status() {
        let dir = tempdir().unwrap();
        let body = body();

        {
            let mut tracker =
                ActivationTracker::with_snapshots(SnapshotStore::new(dir.path()));
            tracker.switch("demo");
            tracker.activate(&body, &[0]);
        }

        let renamed = vec![Fragment::extracted("Alpha Renamed", "alpha text", "a")];

        let mut tracker = ActivationTracker::with_snapshots(SnapshotStore::new(dir.path()));
        tracker.switch("demo");

        assert_eq!(tracker.restore(&renamed), 0);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_snapshot_inactive_records_ignored() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::new(dir.path());
        store
            .save(
                "demo",
                &[
                    ActivationRecord::new("Alpha", false),
                    ActivationRecord::new("Beta", true),
                ],
            )
            .unwrap();

        let mut tracker = ActivationTracker::with_snapshots(SnapshotStore::new(dir.path()));
        tracker.switch("demo");
        let restored = tracker.restore(&body());

        assert_eq!(restored, 1);
        assert_eq!(tracker.active()[0].name, "Beta");
    }

    #[test]
    fn test_restore_without_snapshot_store() {
        let mut tracker = ActivationTracker::new();
        tracker.switch("demo");
        assert_eq!(tracker.restore(&body()), 0);
    }
}
