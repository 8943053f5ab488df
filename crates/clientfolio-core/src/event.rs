use serde::{Deserialize, Serialize};

use crate::client::{ClientId, ClientKind};
use crate::folder::FolderId;

/// Events emitted by the folder store when state changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreEvent {
    FolderCreated {
        id: FolderId,
        name: String,
    },
    FolderDeleted {
        id: FolderId,
        name: String,
        clients_removed: usize,
    },
    ClientAdded {
        folder_id: FolderId,
        client_id: ClientId,
        kind: ClientKind,
    },
    ClientDeleted {
        folder_id: FolderId,
        client_id: ClientId,
        kind: ClientKind,
    },
    ClientPromoted {
        folder_id: FolderId,
        client_id: ClientId,
    },
    ClientsDeleted {
        count: usize,
    },
    /// The stored snapshot could not be used and the store started empty.
    SnapshotDiscarded {
        reason: String,
    },
}

impl StoreEvent {
    /// Short notification text for the user.
    pub fn message(&self) -> String {
        match self {
            StoreEvent::FolderCreated { name, .. } => {
                format!("Folder \"{}\" created successfully!", name)
            }
            StoreEvent::FolderDeleted { name, .. } => format!("Folder \"{}\" deleted", name),
            StoreEvent::ClientAdded { .. } => "Client added successfully!".to_string(),
            StoreEvent::ClientDeleted { .. } => "Client removed successfully".to_string(),
            StoreEvent::ClientPromoted { .. } => "Client promoted to Active Clients!".to_string(),
            StoreEvent::ClientsDeleted { count } => format!("{} client(s) deleted", count),
            StoreEvent::SnapshotDiscarded { reason } => {
                format!("Saved data could not be loaded and was reset: {}", reason)
            }
        }
    }
}
