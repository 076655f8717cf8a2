//! Preset aggregate: an ordered body-fragment list plus one prefix block.

use crate::fragment::Fragment;

/// A named collection of body fragments and the merged prefix text for
/// one extraction source.
///
/// Presets are created by extraction or explicit create and mutated only
/// through the preset store; nothing else holds a mutable handle to the
/// fragment list.
#[derive(Debug, Clone, Default)]
pub struct Preset {
    /// Preset name (the source file stem or the user-chosen name).
    pub name: String,

    /// Ordered body fragments.
    fragments: Vec<Fragment>,

    /// Merged prefix text, empty when the preset has no prefix block.
    prefix: String,
}

impl Preset {
    /// Creates an empty preset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fragments: Vec::new(),
            prefix: String::new(),
        }
    }

    /// Returns the ordered body-fragment list.
    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Returns the fragment at `index`, if in range.
    pub fn fragment(&self, index: usize) -> Option<&Fragment> {
        self.fragments.get(index)
    }

    /// Returns the merged prefix text.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Sets the merged prefix text.
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    /// Appends a fragment to the end of the body list.
    pub fn push_fragment(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// Removes and returns the fragment at `index`, if in range.
    pub fn remove_fragment(&mut self, index: usize) -> Option<Fragment> {
        if index < self.fragments.len() {
            Some(self.fragments.remove(index))
        } else {
            None
        }
    }

    /// Sorts the body list by display name for deterministic listing.
    pub fn sort_by_name(&mut self) {
        self.fragments.sort_by(|a, b| a.name.cmp(&b.name));
    }

    /// Returns the number of body fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    /// Returns true if the preset has no body fragments.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}
