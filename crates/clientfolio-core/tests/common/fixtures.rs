//! Test fixture loading and store builders

use std::path::PathBuf;

use clientfolio_core::{ClientKind, FolderStore, MemoryBackend, NewClient, DEFAULT_STORAGE_KEY};

/// Get the path to a fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test_fixtures")
        .join(name)
}

/// Load a fixture file as a string
#[allow(dead_code)]
pub fn load_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture_path(name))
        .unwrap_or_else(|_| panic!("Failed to load fixture: {}", name))
}

/// An empty store over a fresh in-memory backend
#[allow(dead_code)]
pub fn empty_store() -> FolderStore<MemoryBackend> {
    FolderStore::open(MemoryBackend::new(), DEFAULT_STORAGE_KEY)
}

/// Client input with plausible field values derived from `name`
#[allow(dead_code)]
pub fn client_input(name: &str) -> NewClient {
    NewClient::new(
        name,
        format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        format!("{} needs a better booking system", name),
    )
}

/// A folder holding `active` and `potential` generated clients; returns its id
#[allow(dead_code)]
pub fn add_populated_folder(
    store: &mut FolderStore<MemoryBackend>,
    name: &str,
    active: usize,
    potential: usize,
) -> String {
    let folder_id = store.create_folder(name).expect("folder name is valid");
    for i in 0..active {
        store
            .add_client(&folder_id, ClientKind::Active, &client_input(&format!("{name} A{i}")))
            .expect("client input is valid");
    }
    for i in 0..potential {
        store
            .add_client(&folder_id, ClientKind::Potential, &client_input(&format!("{name} P{i}")))
            .expect("client input is valid");
    }
    folder_id
}
