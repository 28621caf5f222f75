//! Selection set: ordered selected ids plus the optional key object.
//!
//! Ids are kept in selection order without duplicates. The key object, when
//! present, is always one of the selected ids; alignment anchors on it. The
//! set never owns layers, so ids can go stale when the store changes;
//! [`SelectionSet::active_layer_ids`] filters those out at use time.

#[cfg(test)]
#[path = "selection_test.rs"]
mod selection_test;

use tracing::debug;

use crate::doc::LayerStore;
use crate::layer::{Layer, LayerId, new_layer_id};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSet {
    ids: Vec<LayerId>,
    key: Option<LayerId>,
}

impl SelectionSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection with a single id, which also becomes the key object.
    pub fn select(&mut self, id: impl Into<LayerId>) {
        let id = id.into();
        self.ids = vec![id.clone()];
        self.key = Some(id);
    }

    /// Add or remove one id. An added id becomes the key object; removing
    /// the key object clears it.
    pub fn toggle(&mut self, id: &str) {
        if let Some(i) = self.ids.iter().position(|s| s == id) {
            self.ids.remove(i);
            if self.key.as_deref() == Some(id) {
                self.key = None;
            }
        } else {
            self.ids.push(id.to_owned());
            self.key = Some(id.to_owned());
        }
    }

    /// Replace the whole selection, keeping order and dropping duplicates.
    /// The key object survives only if it is still selected.
    pub fn set_selection<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<LayerId>,
    {
        self.ids.clear();
        for id in ids {
            let id = id.into();
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
        if self.key.as_ref().is_some_and(|k| !self.ids.contains(k)) {
            self.key = None;
        }
    }

    /// Select every visible, unlocked layer in z-order.
    pub fn select_all(&mut self, store: &LayerStore) {
        let ids = store.iter().filter(|l| l.is_selectable()).map(|l| l.id.clone());
        self.set_selection(ids);
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.key = None;
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|s| s == id)
    }

    /// Selected ids in selection order.
    #[must_use]
    pub fn ids(&self) -> &[LayerId] {
        &self.ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn key_object_id(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Make a selected id the key object. Unselected ids are refused.
    pub fn set_key_object(&mut self, id: Option<&str>) -> bool {
        match id {
            None => {
                self.key = None;
                true
            }
            Some(id) if self.contains(id) => {
                self.key = Some(id.to_owned());
                true
            }
            Some(_) => false,
        }
    }

    /// Drop ids no longer present in the store. Returns `true` if anything was removed.
    pub fn retain_existing(&mut self, store: &LayerStore) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| store.contains(id));
        if self.key.as_deref().is_some_and(|k| !store.contains(k)) {
            self.key = None;
        }
        self.ids.len() != before
    }

    /// Selected ids that exist and are unlocked, in selection order.
    #[must_use]
    pub fn active_layer_ids(&self, store: &LayerStore) -> Vec<LayerId> {
        self.active_layers(store).into_iter().map(|l| l.id.clone()).collect()
    }

    /// Selected layers that exist and are unlocked, in selection order.
    #[must_use]
    pub fn active_layers<'a>(&self, store: &'a LayerStore) -> Vec<&'a Layer> {
        self.ids.iter().filter_map(|id| store.get(id)).filter(|l| !l.locked).collect()
    }

    /// The key object when it still exists, is unlocked and is selected.
    #[must_use]
    pub fn key_layer_id(&self, store: &LayerStore) -> Option<&str> {
        let key = self.key.as_deref()?;
        let layer = store.get(key)?;
        (!layer.locked && self.contains(key)).then_some(key)
    }

    /// Remove every selected unlocked layer from the store. Locked layers stay selected.
    pub fn delete_selected(&mut self, store: &mut LayerStore) -> usize {
        let doomed = self.active_layer_ids(store);
        for id in &doomed {
            store.remove(id);
        }
        self.retain_existing(store);
        debug!(count = doomed.len(), "deleted selected layers");
        doomed.len()
    }

    /// Copy every selected unlocked layer, offset by `(dx, dy)`, directly above its
    /// original. The copies become the selection; their ids are returned.
    pub fn duplicate_selected(&mut self, store: &mut LayerStore, dx: f64, dy: f64) -> Vec<LayerId> {
        let originals: Vec<Layer> = self.active_layers(store).into_iter().cloned().collect();
        let mut copies = Vec::with_capacity(originals.len());
        for original in originals {
            let source_id = original.id.clone();
            let mut copy = original;
            copy.id = new_layer_id();
            copy.translate(dx, dy);
            copies.push(copy.id.clone());
            store.insert_after(&source_id, copy);
        }
        if !copies.is_empty() {
            self.set_selection(copies.clone());
            self.key = copies.last().cloned();
            debug!(count = copies.len(), "duplicated selected layers");
        }
        copies
    }
}
