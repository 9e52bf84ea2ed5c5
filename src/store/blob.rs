//! Key-value byte stores backing [`RecordStore`](super::RecordStore).

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tempfile::NamedTempFile;

use super::StoreKey;
use crate::error::{Result, StatsError};

/// Opaque byte store addressed by [`StoreKey`].
///
/// `put` must be atomic: a concurrent or subsequent `get` observes either the
/// previous bytes or the new bytes, never a mix.
pub trait BlobStore: Send + Sync {
    /// Returns the bytes stored under `key`, or `None` if there are none.
    fn get(&self, key: &StoreKey) -> Result<Option<Vec<u8>>>;

    /// Stores `bytes` under `key`, replacing any previous value.
    fn put(&self, key: &StoreKey, bytes: &[u8]) -> Result<()>;

    /// Removes the value under `key`. Returns `true` if one existed.
    fn remove(&self, key: &StoreKey) -> Result<bool>;

    /// Returns `true` if a value exists under `key`.
    fn contains(&self, key: &StoreKey) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

/// Directory of `<key>.json` files.
///
/// Writes go to a temporary file in the same directory which is then
/// renamed over the target, so readers never see a half-written blob.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    /// Creates a store rooted at `root`. The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the store directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file that holds `key`.
    pub fn path_for(&self, key: &StoreKey) -> PathBuf {
        self.root.join(format!("{}.json", key.as_str()))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &StoreKey) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&self, key: &StoreKey, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root)?;

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path_for(key))
            .map_err(|err| StatsError::Io(err.error))?;
        Ok(())
    }

    fn remove(&self, key: &StoreKey) -> Result<bool> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn contains(&self, key: &StoreKey) -> Result<bool> {
        Ok(self.path_for(key).is_file())
    }
}

/// In-process store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored blobs.
    pub fn len(&self) -> usize {
        self.entries.read().map(|entries| entries.len()).unwrap_or(0)
    }

    /// Returns `true` if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StatsError {
    StatsError::Io(io::Error::other("memory store lock poisoned"))
}

impl BlobStore for MemoryBlobStore {
    fn get(&self, key: &StoreKey) -> Result<Option<Vec<u8>>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(key.as_str()).cloned())
    }

    fn put(&self, key: &StoreKey, bytes: &[u8]) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(key.as_str().to_string(), bytes.to_vec());
        Ok(())
    }

    fn remove(&self, key: &StoreKey) -> Result<bool> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        Ok(entries.remove(key.as_str()).is_some())
    }
}
