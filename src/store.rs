use crate::error::Result;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Namespace key under which the ledger snapshot is persisted.
pub const STORE_KEY: &str = "tallybook";

/// Best-effort key-value storage for serialized snapshots. Read
/// failures collapse to `None`; write failures must not propagate.
pub trait SnapshotStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Default)]
pub struct InMemoryStore {
    entries: HashMap<String, String>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for InMemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Stores each key as a JSON document in a directory, written via a
/// temp file and rename so readers never see a half-written snapshot.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens (creating if needed) the storage directory.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl SnapshotStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path_for(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let result = fs::write(&tmp, value).and_then(|()| fs::rename(&tmp, &path));
        if let Err(err) = result {
            warn!(%err, path = %path.display(), "failed to write snapshot");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_in_memory_store_set_get() {
        let mut store = InMemoryStore::new();
        assert!(store.get(STORE_KEY).is_none());

        store.set(STORE_KEY, "{\"version\":1}");
        assert_eq!(store.get(STORE_KEY).as_deref(), Some("{\"version\":1}"));

        store.set(STORE_KEY, "{\"version\":2}");
        assert_eq!(store.get(STORE_KEY).as_deref(), Some("{\"version\":2}"));
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        assert!(store.get(STORE_KEY).is_none());
        store.set(STORE_KEY, "payload");
        assert_eq!(store.get(STORE_KEY).as_deref(), Some("payload"));

        // A second handle over the same directory sees the write.
        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(reopened.get(STORE_KEY).as_deref(), Some("payload"));
    }

    #[test]
    fn test_file_store_creates_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();
        assert!(store.root().exists());
    }
}
