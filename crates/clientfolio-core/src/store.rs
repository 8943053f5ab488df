use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};

use crate::analytics::{self, Analytics};
use crate::client::{Client, ClientId, ClientKind, NewClient};
use crate::error::{PersistenceError, Result, StoreError};
use crate::event::StoreEvent;
use crate::folder::{Folder, FolderId};
use crate::query::{self, FolderView, SearchQuery};
use crate::selection::Selection;
use crate::snapshot::{self, Snapshot, SnapshotBackend};

/// What happened when the stored snapshot was read.
#[derive(Debug)]
pub enum LoadOutcome {
    /// Nothing stored under the key yet.
    Missing,
    Loaded { folders: usize },
    /// The snapshot was unreadable and the store started empty.
    Discarded(PersistenceError),
}

/// The authoritative folder collection plus its snapshot backend.
///
/// All mutations take `&mut self` and run to completion, then write a fresh
/// snapshot. A failed write is logged and the in-memory state is kept.
/// Validation failures return an error and leave everything untouched.
pub struct FolderStore<B: SnapshotBackend> {
    folders: Vec<Folder>,
    selection: Selection,
    backend: B,
    key: String,
    subscribers: Vec<Sender<StoreEvent>>,
}

impl<B: SnapshotBackend> FolderStore<B> {
    /// An empty store. Call [`FolderStore::load`] to restore saved state.
    pub fn new(backend: B, key: impl Into<String>) -> Self {
        Self {
            folders: Vec::new(),
            selection: Selection::new(),
            backend,
            key: key.into(),
            subscribers: Vec::new(),
        }
    }

    /// Create a store and restore whatever is saved under `key`.
    pub fn open(backend: B, key: impl Into<String>) -> Self {
        let mut store = Self::new(backend, key);
        store.load();
        store
    }

    /// Replace the in-memory state with the stored snapshot.
    ///
    /// Never fails: unreadable data is discarded and the store starts empty.
    pub fn load(&mut self) -> LoadOutcome {
        self.selection.clear();
        match self.read_snapshot() {
            Ok(Some(snapshot)) => {
                let count = snapshot.folders.len();
                self.folders = snapshot.folders;
                tracing::info!(key = %self.key, folders = count, "loaded snapshot");
                LoadOutcome::Loaded { folders: count }
            }
            Ok(None) => {
                self.folders.clear();
                tracing::debug!(key = %self.key, "no snapshot stored");
                LoadOutcome::Missing
            }
            Err(e) => {
                self.folders.clear();
                tracing::warn!(key = %self.key, error = %e, "discarding unreadable snapshot");
                self.emit(StoreEvent::SnapshotDiscarded {
                    reason: e.to_string(),
                });
                LoadOutcome::Discarded(e)
            }
        }
    }

    fn read_snapshot(&self) -> std::result::Result<Option<Snapshot>, PersistenceError> {
        let Some(contents) = self.backend.read(&self.key)? else {
            return Ok(None);
        };
        let snapshot = Snapshot::from_json(&contents)?;
        snapshot.validate()?;
        Ok(Some(snapshot))
    }

    /// Write the full collection under the store's key.
    pub fn save(&mut self) -> std::result::Result<(), PersistenceError> {
        let json = snapshot::encode(&self.folders)?;
        self.backend.write(&self.key, &json)
    }

    fn persist(&mut self) {
        if let Err(e) = self.save() {
            tracing::warn!(key = %self.key, error = %e, "failed to write snapshot, keeping in-memory state");
        }
    }

    /// Receive every event emitted from now on.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn emit(&mut self, event: StoreEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    // --- Reads ---

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn folder(&self, id: &str) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    fn folder_mut(&mut self, id: &str) -> Option<&mut Folder> {
        self.folders.iter_mut().find(|f| f.id == id)
    }

    /// Find a client anywhere in the collection.
    pub fn find_client(&self, client_id: &str) -> Option<(&Folder, ClientKind, &Client)> {
        self.folders.iter().find_map(|f| {
            f.find_client(client_id)
                .map(|(kind, client)| (f, kind, client))
        })
    }

    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }

    pub fn client_count(&self) -> usize {
        self.folders.iter().map(Folder::client_count).sum()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn search(&self, query: &SearchQuery) -> Vec<FolderView<'_>> {
        query::search(&self.folders, query)
    }

    pub fn analytics(&self) -> Analytics {
        Analytics::compute(&self.folders)
    }

    pub fn recent_clients(&self, limit: usize) -> Vec<&Client> {
        analytics::recent_clients(&self.folders, limit)
    }

    // --- Folders ---

    /// Append a new, empty folder. The name is trimmed and must not be blank.
    pub fn create_folder(&mut self, name: &str) -> Result<FolderId> {
        let folder = Folder::new(name)?;
        let id = folder.id.clone();
        let name = folder.name.clone();
        self.folders.push(folder);
        tracing::debug!(folder_id = %id, "created folder");
        self.persist();
        self.emit(StoreEvent::FolderCreated {
            id: id.clone(),
            name,
        });
        Ok(id)
    }

    /// How many clients deleting this folder would destroy.
    pub fn deletion_impact(&self, folder_id: &str) -> Option<usize> {
        self.folder(folder_id).map(Folder::client_count)
    }

    /// Remove a folder and every client in it. Returns the removed folder.
    ///
    /// Confirmation for non-empty folders is the caller's job; see
    /// [`FolderStore::deletion_impact`].
    pub fn delete_folder(&mut self, folder_id: &str) -> Option<Folder> {
        let index = self.folders.iter().position(|f| f.id == folder_id)?;
        let folder = self.folders.remove(index);
        for client in folder.all_clients() {
            self.selection.remove(&client.id);
        }
        let clients_removed = folder.client_count();
        tracing::debug!(folder_id = %folder.id, clients_removed, "deleted folder");
        self.persist();
        self.emit(StoreEvent::FolderDeleted {
            id: folder.id.clone(),
            name: folder.name.clone(),
            clients_removed,
        });
        Some(folder)
    }

    // --- Clients ---

    /// Append a client to one of a folder's lists.
    pub fn add_client(
        &mut self,
        folder_id: &str,
        kind: ClientKind,
        input: &NewClient,
    ) -> Result<ClientId> {
        let valid = input.validate()?;
        let folder = self
            .folder_mut(folder_id)
            .ok_or_else(|| StoreError::FolderNotFound(folder_id.to_string()))?;
        let client = Client::new(valid);
        let client_id = client.id.clone();
        folder.clients_mut(kind).push(client);
        tracing::debug!(folder_id, client_id = %client_id, kind = %kind, "added client");
        self.persist();
        self.emit(StoreEvent::ClientAdded {
            folder_id: folder_id.to_string(),
            client_id: client_id.clone(),
            kind,
        });
        Ok(client_id)
    }

    /// Remove a client from the named list. Returns whether one was removed.
    pub fn delete_client(&mut self, folder_id: &str, client_id: &str, kind: ClientKind) -> bool {
        self.selection.remove(client_id);
        let removed = self
            .folder_mut(folder_id)
            .and_then(|f| f.remove_client(client_id, kind))
            .is_some();
        if removed {
            tracing::debug!(folder_id, client_id, kind = %kind, "deleted client");
            self.persist();
            self.emit(StoreEvent::ClientDeleted {
                folder_id: folder_id.to_string(),
                client_id: client_id.to_string(),
                kind,
            });
        }
        removed
    }

    /// Move a client from potential to the end of active.
    pub fn promote_client(&mut self, folder_id: &str, client_id: &str) -> bool {
        let Some(folder) = self.folder_mut(folder_id) else {
            return false;
        };
        let Some(client) = folder.remove_client(client_id, ClientKind::Potential) else {
            return false;
        };
        folder.active_clients.push(client);
        tracing::debug!(folder_id, client_id, "promoted client");
        self.persist();
        self.emit(StoreEvent::ClientPromoted {
            folder_id: folder_id.to_string(),
            client_id: client_id.to_string(),
        });
        true
    }

    // --- Bulk selection ---

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_selected(&self, client_id: &str) -> bool {
        self.selection.contains(client_id)
    }

    /// Returns whether the client is selected afterwards.
    pub fn toggle_selection(&mut self, client_id: &str) -> bool {
        self.selection.toggle(client_id)
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Remove every client whose id is in `ids`, from every folder and list.
    pub fn delete_clients(&mut self, ids: &HashSet<ClientId>) -> usize {
        if ids.is_empty() {
            return 0;
        }
        let mut removed = 0;
        for folder in &mut self.folders {
            for list in [&mut folder.active_clients, &mut folder.potential_clients] {
                let before = list.len();
                list.retain(|c| !ids.contains(&c.id));
                removed += before - list.len();
            }
        }
        for id in ids {
            self.selection.remove(id);
        }
        if removed > 0 {
            tracing::debug!(removed, "bulk deleted clients");
            self.persist();
            self.emit(StoreEvent::ClientsDeleted { count: removed });
        }
        removed
    }

    /// Delete everything in the selection, then clear it.
    pub fn delete_selected(&mut self) -> usize {
        let ids = std::mem::take(&mut self.selection).ids().clone();
        self.delete_clients(&ids)
    }
}

impl<B: SnapshotBackend + std::fmt::Debug> std::fmt::Debug for FolderStore<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FolderStore")
            .field("key", &self.key)
            .field("folders", &self.folders.len())
            .field("selected", &self.selection.len())
            .field("backend", &self.backend)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{MemoryBackend, DEFAULT_STORAGE_KEY};

    fn store() -> FolderStore<MemoryBackend> {
        FolderStore::open(MemoryBackend::new(), DEFAULT_STORAGE_KEY)
    }

    fn input(name: &str) -> NewClient {
        NewClient::new(name, format!("{name}@example.com"), "needs help")
    }

    #[test]
    fn create_folder_appends_and_persists() {
        let mut s = store();
        let id = s.create_folder("  Leads ").unwrap();
        assert_eq!(s.folder_count(), 1);
        assert_eq!(s.folder(&id).unwrap().name, "Leads");

        let saved = s.backend().get(DEFAULT_STORAGE_KEY).unwrap();
        assert!(saved.contains("\"name\":\"Leads\""));
    }

    #[test]
    fn blank_folder_name_is_a_no_op() {
        let mut s = store();
        assert!(matches!(s.create_folder("   "), Err(StoreError::Validation(_))));
        assert_eq!(s.folder_count(), 0);
        assert!(s.backend().get(DEFAULT_STORAGE_KEY).is_none());
    }

    #[test]
    fn add_client_to_unknown_folder_fails() {
        let mut s = store();
        let err = s
            .add_client("missing", ClientKind::Active, &input("A"))
            .unwrap_err();
        assert!(matches!(err, StoreError::FolderNotFound(_)));
    }

    #[test]
    fn add_client_with_blank_field_leaves_state() {
        let mut s = store();
        let f = s.create_folder("Leads").unwrap();
        let bad = NewClient::new("Acme", "", "x");
        assert!(s.add_client(&f, ClientKind::Active, &bad).is_err());
        assert_eq!(s.client_count(), 0);
    }

    #[test]
    fn delete_client_drops_selection() {
        let mut s = store();
        let f = s.create_folder("Leads").unwrap();
        let c = s.add_client(&f, ClientKind::Potential, &input("A")).unwrap();
        s.toggle_selection(&c);
        assert!(s.is_selected(&c));

        // wrong list: nothing removed, but the selection is still dropped
        assert!(!s.delete_client(&f, &c, ClientKind::Active));
        assert!(!s.is_selected(&c));
        assert!(s.delete_client(&f, &c, ClientKind::Potential));
        assert_eq!(s.client_count(), 0);
    }

    #[test]
    fn promote_only_moves_potential_clients() {
        let mut s = store();
        let f = s.create_folder("Leads").unwrap();
        let active = s.add_client(&f, ClientKind::Active, &input("A")).unwrap();
        assert!(!s.promote_client(&f, &active));
        assert!(!s.promote_client(&f, "nope"));
        assert!(!s.promote_client("nope", &active));
        assert_eq!(s.folder(&f).unwrap().active_clients.len(), 1);
    }

    #[test]
    fn delete_folder_reports_impact() {
        let mut s = store();
        let f = s.create_folder("Leads").unwrap();
        s.add_client(&f, ClientKind::Active, &input("A")).unwrap();
        let c = s.add_client(&f, ClientKind::Potential, &input("B")).unwrap();
        s.toggle_selection(&c);

        assert_eq!(s.deletion_impact(&f), Some(2));
        assert_eq!(s.deletion_impact("missing"), None);

        let removed = s.delete_folder(&f).unwrap();
        assert_eq!(removed.client_count(), 2);
        assert!(s.find_client(&c).is_none());
        assert!(s.selection().is_empty());
        assert!(s.delete_folder(&f).is_none());
    }

    #[test]
    fn delete_selected_with_empty_selection() {
        let mut s = store();
        let f = s.create_folder("Leads").unwrap();
        s.add_client(&f, ClientKind::Active, &input("A")).unwrap();
        assert_eq!(s.delete_selected(), 0);
        assert_eq!(s.client_count(), 1);
    }

    #[test]
    fn events_are_delivered() {
        let mut s = store();
        let rx = s.subscribe();
        let f = s.create_folder("Leads").unwrap();
        let c = s.add_client(&f, ClientKind::Potential, &input("A")).unwrap();
        s.promote_client(&f, &c);

        let events: Vec<StoreEvent> = rx.try_iter().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], StoreEvent::FolderCreated { .. }));
        assert!(matches!(
            events[1],
            StoreEvent::ClientAdded {
                kind: ClientKind::Potential,
                ..
            }
        ));
        assert_eq!(events[2].message(), "Client promoted to Active Clients!");
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let mut s = store();
        drop(s.subscribe());
        s.create_folder("Leads").unwrap();
        assert!(s.subscribers.is_empty());
    }

    #[test]
    fn write_failure_keeps_memory_state() {
        let mut backend = MemoryBackend::new();
        backend.set_fail_writes(true);
        let mut s = FolderStore::open(backend, DEFAULT_STORAGE_KEY);
        let f = s.create_folder("Leads").unwrap();
        assert!(s.folder(&f).is_some());
        assert!(s.save().is_err());

        s.backend_mut().set_fail_writes(false);
        s.save().unwrap();
        assert!(s.backend().get(DEFAULT_STORAGE_KEY).is_some());
    }
}
