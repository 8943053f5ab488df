//! clientfolio-core - client tracking by folder
//!
//! - **Client / Folder**: the data model. A folder owns an active and a
//!   potential client list, both in insertion order.
//! - **Store**: `FolderStore` holds the collection, applies mutations, keeps
//!   the bulk selection, and writes a snapshot after every change.
//! - **Query**: literal, case-insensitive search and match highlighting.
//! - **Analytics**: totals, conversion rate, averages, recent clients.
//! - **Snapshot**: versioned JSON documents over a key-value backend
//!   (in-memory or one file per key).
//! - **Event**: change notifications delivered over `mpsc` channels.
//! - **Export**: plain-text formatting for the clipboard.
//! - **Config**: storage location and dashboard settings.

pub mod analytics;
pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod folder;
pub mod query;
pub mod selection;
pub mod snapshot;
pub mod store;

pub use analytics::{
    distribution, folder_breakdown, most_populated_folder, recent_clients, Analytics,
    Distribution, FolderBreakdown, DEFAULT_RECENT_LIMIT,
};
pub use client::{Client, ClientId, ClientKind, NewClient, ValidClient};
pub use config::{AnalyticsConfig, ClientfolioConfig, StorageConfig};
pub use error::{ConfigError, PersistenceError, Result, StoreError};
pub use event::StoreEvent;
pub use export::{clipboard_text, folder_text};
pub use folder::{Folder, FolderId};
pub use query::{filter_clients, filter_folder, highlight, search, FolderView, SearchQuery, Segment};
pub use selection::Selection;
pub use snapshot::{
    FileBackend, MemoryBackend, Snapshot, SnapshotBackend, DEFAULT_STORAGE_KEY, SNAPSHOT_VERSION,
};
pub use store::{FolderStore, LoadOutcome};
