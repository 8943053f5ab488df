//! Folder representation for grouping clients

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{now_millis, Client, ClientKind};
use crate::error::StoreError;

/// Opaque folder identifier (UUID v4 text for new folders).
pub type FolderId = String;

/// A named grouping that owns an active and a potential client list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
    pub active_clients: Vec<Client>,
    pub potential_clients: Vec<Client>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Folder {
    /// Create an empty folder. The name is trimmed and must not be empty.
    pub fn new(name: &str) -> Result<Self, StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::Validation("folder name is required".into()));
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            active_clients: Vec::new(),
            potential_clients: Vec::new(),
            created_at: now_millis(),
        })
    }

    pub fn clients(&self, kind: ClientKind) -> &[Client] {
        match kind {
            ClientKind::Active => &self.active_clients,
            ClientKind::Potential => &self.potential_clients,
        }
    }

    pub fn clients_mut(&mut self, kind: ClientKind) -> &mut Vec<Client> {
        match kind {
            ClientKind::Active => &mut self.active_clients,
            ClientKind::Potential => &mut self.potential_clients,
        }
    }

    /// Active then potential, each in insertion order.
    pub fn all_clients(&self) -> impl Iterator<Item = &Client> {
        self.active_clients.iter().chain(self.potential_clients.iter())
    }

    pub fn client_count(&self) -> usize {
        self.active_clients.len() + self.potential_clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.client_count() == 0
    }

    /// Locate a client in either list.
    pub fn find_client(&self, client_id: &str) -> Option<(ClientKind, &Client)> {
        if let Some(c) = self.active_clients.iter().find(|c| c.id == client_id) {
            return Some((ClientKind::Active, c));
        }
        self.potential_clients
            .iter()
            .find(|c| c.id == client_id)
            .map(|c| (ClientKind::Potential, c))
    }

    /// Remove a client from the given list, returning it if it was there.
    pub fn remove_client(&mut self, client_id: &str, kind: ClientKind) -> Option<Client> {
        let list = self.clients_mut(kind);
        let index = list.iter().position(|c| c.id == client_id)?;
        Some(list.remove(index))
    }
}
