//! Session-local identity map for vertices and edges.
//!
//! Every vertex and edge decoded by one session is stored here once, keyed by
//! its graph id. Decoding the same id again hands back the stored `Arc`, so
//! identical elements across paths and calls share one allocation.
//!
//! Entries live in an append-only arena (`slots`) with an id → slot index
//! map on the side. The cache never evicts; [`IdentityCache::clear`] drops
//! everything at once.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entity::{Edge, EntityKind, Vertex};

/// One cached graph element.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedElement {
    Vertex(Arc<Vertex>),
    Edge(Arc<Edge>),
}

impl CachedElement {
    pub fn id(&self) -> i64 {
        match self {
            CachedElement::Vertex(v) => v.id(),
            CachedElement::Edge(e) => e.id(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CachedElement::Vertex(v) => v.label(),
            CachedElement::Edge(e) => e.label(),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            CachedElement::Vertex(_) => EntityKind::Vertex,
            CachedElement::Edge(_) => EntityKind::Edge,
        }
    }
}

#[derive(Debug, Default)]
pub struct IdentityCache {
    slots: Vec<CachedElement>,
    index: HashMap<i64, usize>,
}

impl IdentityCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn contains(&self, id: i64) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: i64) -> Option<&CachedElement> {
        self.index.get(&id).map(|&slot| &self.slots[slot])
    }

    pub fn vertex(&self, id: i64) -> Option<&Arc<Vertex>> {
        match self.get(id) {
            Some(CachedElement::Vertex(v)) => Some(v),
            _ => None,
        }
    }

    pub fn edge(&self, id: i64) -> Option<&Arc<Edge>> {
        match self.get(id) {
            Some(CachedElement::Edge(e)) => Some(e),
            _ => None,
        }
    }

    /// Store `element` under its id and return the stored copy.
    ///
    /// If the id is already present the existing entry wins and `element`
    /// is dropped; callers check for a hit before building a new element.
    pub fn insert(&mut self, element: CachedElement) -> CachedElement {
        let id = element.id();
        if let Some(&slot) = self.index.get(&id) {
            return self.slots[slot].clone();
        }
        log::trace!(
            "IdentityCache: caching {} {} ({}) in slot {}",
            element.kind(),
            id,
            element.label(),
            self.slots.len()
        );
        self.index.insert(id, self.slots.len());
        self.slots.push(element.clone());
        element
    }

    pub fn clear(&mut self) {
        log::debug!("IdentityCache: clearing {} entries", self.slots.len());
        self.slots.clear();
        self.index.clear();
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CachedElement> {
        self.slots.iter()
    }
}
