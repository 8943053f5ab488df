//! Transient bulk-selection set.

use std::collections::HashSet;

use crate::client::ClientId;

/// Client ids marked for a bulk action, across all folders and lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: HashSet<ClientId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip membership. Returns whether the id is selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClientId> {
        self.ids.iter()
    }

    pub fn ids(&self) -> &HashSet<ClientId> {
        &self.ids
    }
}
