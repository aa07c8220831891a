use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::dataset::ChannelPair;

/// Saved selection for one channel pair.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterSlot {
    pub pair: ChannelPair,
    pub indices: Vec<usize>,
}

/// Combined filter across all saved selections.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterIntersection {
    /// No filter has been saved; every event passes.
    Inactive,
    /// Events present in every saved selection, ascending. May be empty.
    Active(Vec<usize>),
}

impl FilterIntersection {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    pub fn indices(&self) -> Option<&[usize]> {
        match self {
            Self::Inactive => None,
            Self::Active(v) => Some(v.as_slice()),
        }
    }
}

/// At most one saved selection per channel pair.
///
/// Slots live in a compact list; `index` maps each pair to its slot.
/// Every mutation bumps `revision`, which tags derived data such as the
/// intersection and the excluded overlay.
#[derive(Debug, Default)]
pub struct FilterStore {
    slots: Vec<FilterSlot>,
    index: HashMap<ChannelPair, usize>,
    revision: u64,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[FilterSlot] {
        &self.slots
    }

    pub fn slot_for(&self, pair: &ChannelPair) -> Option<usize> {
        self.index.get(pair).copied()
    }

    pub fn get(&self, pair: &ChannelPair) -> Option<&[usize]> {
        self.slot_for(pair).map(|i| self.slots[i].indices.as_slice())
    }

    /// Index lists of every slot, in slot order.
    pub fn slot_indices(&self) -> Vec<Vec<usize>> {
        self.slots.iter().map(|s| s.indices.clone()).collect()
    }

    /// Store `indices` for `pair`, overwriting an existing slot in place.
    pub fn save_selection(&mut self, pair: &ChannelPair, indices: Vec<usize>) {
        match self.index.get(pair) {
            Some(&slot) => self.slots[slot].indices = indices,
            None => {
                self.index.insert(pair.clone(), self.slots.len());
                self.slots.push(FilterSlot {
                    pair: pair.clone(),
                    indices,
                });
            }
        }
        self.revision += 1;
        debug!(pair = %pair, slots = self.slots.len(), revision = self.revision, "Filter saved");
    }

    /// Remove the slot for `pair` and shift later slots down. Returns whether
    /// a slot existed.
    pub fn clear_selection(&mut self, pair: &ChannelPair) -> bool {
        let Some(removed) = self.index.remove(pair) else {
            return false;
        };
        self.slots.remove(removed);
        for slot in self.index.values_mut() {
            if *slot > removed {
                *slot -= 1;
            }
        }
        self.revision += 1;
        debug!(pair = %pair, slots = self.slots.len(), revision = self.revision, "Filter cleared");
        true
    }

    pub fn intersection(&self) -> FilterIntersection {
        if self.slots.is_empty() {
            return FilterIntersection::Inactive;
        }
        FilterIntersection::Active(intersect_filters(&self.slot_indices()))
    }

    /// Drop all slots; called when a different dataset is loaded.
    pub fn load_new_dataset(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.revision += 1;
    }
}

/// Indices present in every list, ascending. An empty input gives an empty
/// result.
pub fn intersect_filters(slots: &[Vec<usize>]) -> Vec<usize> {
    let Some((first, rest)) = slots.split_first() else {
        return Vec::new();
    };
    let others: Vec<HashSet<usize>> = rest.iter().map(|s| s.iter().copied().collect()).collect();
    let mut result: Vec<usize> = first
        .iter()
        .copied()
        .filter(|i| others.iter().all(|set| set.contains(i)))
        .collect();
    result.sort_unstable();
    result.dedup();
    result
}
