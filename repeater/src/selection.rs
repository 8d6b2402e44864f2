use alloc::vec::Vec;

use crate::ItemKey;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectionMode {
    /// At most one selected item; selecting another replaces it.
    #[default]
    Single,
    Multi,
}

/// Tracks selected items by identity key.
///
/// Selection order is preserved: `selected()` yields keys in the order they were selected.
#[derive(Clone, Debug)]
pub struct Selection<K> {
    mode: SelectionMode,
    toggle: bool,
    selected: Vec<K>,
}

impl<K> Default for Selection<K> {
    fn default() -> Self {
        Self {
            mode: SelectionMode::Single,
            toggle: false,
            selected: Vec::new(),
        }
    }
}

impl<K: ItemKey> Selection<K> {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            toggle: false,
            selected: Vec::new(),
        }
    }

    pub fn with_toggle(mut self, toggle: bool) -> Self {
        self.toggle = toggle;
        self
    }

    pub fn mode(&self) -> SelectionMode {
        self.mode
    }

    /// Switching to single mode keeps only the most recently selected key.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        self.mode = mode;
        if mode == SelectionMode::Single && self.selected.len() > 1 {
            let last = self.selected.len() - 1;
            self.selected.drain(..last);
        }
    }

    pub fn toggle(&self) -> bool {
        self.toggle
    }

    pub fn set_toggle(&mut self, toggle: bool) {
        self.toggle = toggle;
    }

    /// Selects `key`. In toggle mode, selecting an already selected key deselects it.
    ///
    /// Returns `true` when membership changed.
    pub fn select(&mut self, key: K) -> bool {
        if self.is_selected(&key) {
            if self.toggle {
                return self.deselect(&key);
            }
            return false;
        }
        if self.mode == SelectionMode::Single {
            self.selected.clear();
        }
        self.selected.push(key);
        true
    }

    pub fn deselect(&mut self, key: &K) -> bool {
        let before = self.selected.len();
        self.selected.retain(|k| k != key);
        self.selected.len() != before
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, key: &K) -> bool {
        self.selected.iter().any(|k| k == key)
    }

    pub fn selected(&self) -> &[K] {
        &self.selected
    }

    /// The selected key in single mode.
    pub fn selected_item(&self) -> Option<&K> {
        match self.mode {
            SelectionMode::Single => self.selected.first(),
            SelectionMode::Multi => None,
        }
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}
