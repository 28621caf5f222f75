//! Layer collection: the ordered, id-addressable store the engine mutates.
//!
//! Insertion order is z-order (index 0 is drawn first). Every mutation made
//! through the store bumps [`LayerStore::version`]. Each layer also records the
//! version of its last write, so a cache that ignores some layers (the snap
//! index skips the ones being dragged) can key on
//! [`LayerStore::version_excluding`] and survive writes to those layers.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use uuid::Uuid;

use crate::layer::{Layer, LayerId};

/// In-memory ordered store of layers.
#[derive(Debug, Clone)]
pub struct LayerStore {
    identity: Uuid,
    version: u64,
    /// Version of the last insert, removal, reload or [`LayerStore::touch`].
    structure_version: u64,
    /// Version of the last `get_mut` per layer id.
    revisions: HashMap<LayerId, u64>,
    layers: Vec<Layer>,
}

impl LayerStore {
    /// Create an empty store with a fresh identity.
    #[must_use]
    pub fn new() -> Self {
        Self { identity: Uuid::new_v4(), version: 0, structure_version: 0, revisions: HashMap::new(), layers: Vec::new() }
    }

    /// Build a store holding `layers` in the given z-order.
    #[must_use]
    pub fn from_layers(layers: Vec<Layer>) -> Self {
        let mut store = Self::new();
        store.load_snapshot(layers);
        store
    }

    /// Identity of this collection, fixed for its lifetime.
    #[must_use]
    pub fn identity(&self) -> Uuid {
        self.identity
    }

    /// Mutation counter, bumped on every change made through the store.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Latest version that changed the store structure or any layer not in `excluded`.
    ///
    /// Writes made through [`LayerStore::get_mut`] to excluded layers leave it unchanged.
    #[must_use]
    pub fn version_excluding(&self, excluded: &[LayerId]) -> u64 {
        self.revisions
            .iter()
            .filter(|(id, _)| !excluded.contains(*id))
            .map(|(_, rev)| *rev)
            .fold(self.structure_version, u64::max)
    }

    /// Force dependent caches to rebuild without changing any layer.
    pub fn touch(&mut self) {
        self.version += 1;
        self.structure_version = self.version;
    }

    /// Append a layer on top. An existing layer with the same id is replaced in place.
    pub fn insert(&mut self, layer: Layer) {
        self.touch();
        if let Some(slot) = self.layers.iter_mut().find(|l| l.id == layer.id) {
            *slot = layer;
        } else {
            self.layers.push(layer);
        }
    }

    /// Insert a layer directly above the layer `after`, or on top when `after` is unknown.
    pub fn insert_after(&mut self, after: &str, layer: Layer) {
        self.touch();
        match self.index_of(after) {
            Some(i) => self.layers.insert(i + 1, layer),
            None => self.layers.push(layer),
        }
    }

    /// Remove a layer by id, returning it if it was present.
    pub fn remove(&mut self, id: &str) -> Option<Layer> {
        let i = self.index_of(id)?;
        self.touch();
        self.revisions.remove(id);
        Some(self.layers.remove(i))
    }

    /// Return a reference to a layer by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Mutable access to a layer. Bumps the version whether or not the caller writes.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Layer> {
        let i = self.index_of(id)?;
        self.version += 1;
        self.revisions.insert(id.to_owned(), self.version);
        self.layers.get_mut(i)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index_of(id).is_some()
    }

    #[must_use]
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// Replace all layers with a full snapshot.
    pub fn load_snapshot(&mut self, layers: Vec<Layer>) {
        self.touch();
        self.revisions.clear();
        self.layers = layers;
    }

    /// Layers bottom-first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Layer> {
        self.layers.iter()
    }

    #[must_use]
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of layers currently in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns `true` if the store contains no layers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Ids of every layer, bottom-first.
    #[must_use]
    pub fn ids(&self) -> Vec<LayerId> {
        self.layers.iter().map(|l| l.id.clone()).collect()
    }
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new()
    }
}
