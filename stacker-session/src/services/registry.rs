//! Item registry
//!
//! One record per item id holds the binding, the probe result and the trim
//! range together, so removing the record removes everything keyed by that
//! id. Derived state (probe, trim) is only ever cleared through
//! [`ItemEntry::clear_derived`].

use crate::models::{Item, ItemId, ProbeResult, ProbeState, TrimRange};
use std::collections::BTreeMap;
use std::path::Path;

/// Everything the session knows about one item
#[derive(Debug, Clone)]
pub struct ItemEntry {
    pub(crate) item: Item,
    /// Incremented on every upload; probe responses carry the value they were issued with
    pub(crate) generation: u64,
    pub(crate) probing: bool,
    pub(crate) probe: Option<ProbeResult>,
    pub(crate) trim: Option<TrimRange>,
}

impl ItemEntry {
    fn new(id: ItemId) -> Self {
        Self {
            item: Item::new(id),
            generation: 0,
            probing: false,
            probe: None,
            trim: None,
        }
    }

    pub fn item(&self) -> &Item {
        &self.item
    }

    pub fn source(&self) -> Option<&Path> {
        self.item.source.as_deref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn probe(&self) -> Option<&ProbeResult> {
        self.probe.as_ref()
    }

    pub fn trim(&self) -> Option<&TrimRange> {
        self.trim.as_ref()
    }

    pub fn state(&self) -> ProbeState {
        if self.item.source.is_none() {
            return ProbeState::Unbound;
        }
        if self.probing {
            return ProbeState::Probing;
        }
        match &self.probe {
            Some(result) if result.is_success() => ProbeState::Succeeded,
            Some(_) => ProbeState::Failed,
            None => ProbeState::Probing,
        }
    }

    /// Drop probe result and trim range together
    pub(crate) fn clear_derived(&mut self) {
        self.probe = None;
        self.trim = None;
    }
}

/// Live items of a session, in creation order
#[derive(Debug)]
pub struct ItemRegistry {
    next_id: u64,
    entries: BTreeMap<ItemId, ItemEntry>,
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            entries: BTreeMap::new(),
        }
    }

    /// Register a new unbound item with the next sequential id
    pub fn add(&mut self) -> ItemId {
        let id = ItemId::new(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, ItemEntry::new(id));
        id
    }

    /// Remove an item with its probe result and trim range
    ///
    /// Returns `false` (no-op) for an unknown id.
    pub fn remove(&mut self, id: ItemId) -> bool {
        self.entries.remove(&id).is_some()
    }

    /// Drop every item. The id counter keeps counting so ids are never reused.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, id: ItemId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> Vec<ItemId> {
        self.entries.keys().copied().collect()
    }

    pub fn entry(&self, id: ItemId) -> Option<&ItemEntry> {
        self.entries.get(&id)
    }

    pub(crate) fn entry_mut(&mut self, id: ItemId) -> Option<&mut ItemEntry> {
        self.entries.get_mut(&id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ItemEntry> {
        self.entries.values()
    }

    pub fn items(&self) -> Vec<Item> {
        self.entries.values().map(|e| e.item.clone()).collect()
    }

    pub fn probes(&self) -> BTreeMap<ItemId, ProbeResult> {
        self.entries
            .iter()
            .filter_map(|(id, e)| e.probe.clone().map(|p| (*id, p)))
            .collect()
    }

    pub fn trims(&self) -> BTreeMap<ItemId, TrimRange> {
        self.entries
            .iter()
            .filter_map(|(id, e)| e.trim.map(|t| (*id, t)))
            .collect()
    }
}
