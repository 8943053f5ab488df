//! Snapshot documents and the key-value backends that hold them.
//!
//! The whole folder collection is stored as one JSON document under a single
//! key:
//!
//! ```json
//! { "version": 1, "folders": [ { "id": "...", "name": "...", ... } ] }
//! ```
//!
//! Older installs wrote the bare folder array with no envelope. That layout
//! is read as version 0 and rewritten in the current layout on the next save.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::folder::Folder;

/// Current snapshot schema version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Key the folder collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "cms-folders";

/// The persisted form of the folder collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub folders: Vec<Folder>,
}

impl Snapshot {
    pub fn new(folders: Vec<Folder>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            folders,
        }
    }

    /// Parse a stored document, accepting the legacy bare-array layout.
    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.is_array() {
            let folders: Vec<Folder> = serde_json::from_value(value)?;
            return Ok(Self::new(folders));
        }

        let found = value
            .get("version")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| PersistenceError::Serialization("missing snapshot version".into()))?;
        if found > u64::from(SNAPSHOT_VERSION) {
            return Err(PersistenceError::UnsupportedVersion {
                found: u32::try_from(found).unwrap_or(u32::MAX),
                supported: SNAPSHOT_VERSION,
            });
        }

        let mut snapshot: Snapshot = serde_json::from_value(value)?;
        snapshot.version = SNAPSHOT_VERSION;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        encode(&self.folders)
    }

    /// Check the invariants a hand-edited or damaged file may break: unique
    /// ids, and no blank folder names or client fields.
    pub fn validate(&self) -> Result<(), PersistenceError> {
        let mut folder_ids = HashSet::new();
        let mut client_ids = HashSet::new();
        for folder in &self.folders {
            if !folder_ids.insert(folder.id.as_str()) {
                return Err(PersistenceError::Corrupt(format!(
                    "duplicate folder id {}",
                    folder.id
                )));
            }
            if folder.name.trim().is_empty() {
                return Err(PersistenceError::Corrupt(format!(
                    "folder {} has a blank name",
                    folder.id
                )));
            }
            for client in folder.all_clients() {
                if !client_ids.insert(client.id.as_str()) {
                    return Err(PersistenceError::Corrupt(format!(
                        "duplicate client id {}",
                        client.id
                    )));
                }
                let fields = [
                    ("businessName", &client.business_name),
                    ("contactDetails", &client.contact_details),
                    ("problemDescription", &client.problem_description),
                ];
                if let Some((field, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
                    return Err(PersistenceError::Corrupt(format!(
                        "client {} has a blank {}",
                        client.id, field
                    )));
                }
            }
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    folders: &'a [Folder],
}

/// Serialize a folder collection as a current-version snapshot without cloning it.
pub fn encode(folders: &[Folder]) -> Result<String, PersistenceError> {
    Ok(serde_json::to_string(&SnapshotRef {
        version: SNAPSHOT_VERSION,
        folders,
    })?)
}

/// Local key-value storage for snapshot documents.
pub trait SnapshotBackend {
    /// Read the document under `key`, or `None` if nothing was stored.
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    /// Replace the document under `key`.
    fn write(&mut self, key: &str, contents: &str) -> Result<(), PersistenceError>;

    /// Drop the document under `key`. Missing keys are not an error.
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// In-memory backend for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, e.g. with a legacy or damaged document.
    pub fn with_entry(mut self, key: &str, contents: &str) -> Self {
        self.entries.insert(key.to_string(), contents.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Make every subsequent write fail with an IO error.
    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl SnapshotBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<(), PersistenceError> {
        if self.fail_writes {
            return Err(PersistenceError::Io("storage is read-only".into()));
        }
        self.entries.insert(key.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl SnapshotBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, contents: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        atomic_write(&self.path_for(key), contents)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write to a sibling temp file, fsync, then rename over the target.
fn atomic_write(path: &Path, contents: &str) -> std::io::Result<()> {
    let tmp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&tmp_path)?;
    file.write_all(contents.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
