//! Persisted intermediate representation of extracted datasets.
//!
//! Extraction walks the whole HTML document, which is slow for large
//! exports. [`RecordStore`] caches the result as four parallel columns
//! (senders, bodies, date labels, time labels) under a [`StoreKey`] derived
//! from the source file and the extraction settings, so later runs can skip
//! the walk.
//!
//! The columns are serialized together as one JSON object:
//!
//! ```json
//! {"senders":["Alice"],"bodies":[null],"dates":["06/03/18"],"times":["21:14"]}
//! ```
//!
//! `null` marks an attachment entry. Because all four columns live in one
//! blob and blobs are replaced atomically, a reader never sees columns from
//! two different saves.
//!
//! # Example
//!
//! ```rust
//! use chatstats::store::{RecordStore, StoreKey};
//! use chatstats::{Message, MessageDataset};
//! use chrono::NaiveDate;
//!
//! let store = RecordStore::in_memory();
//! let key = StoreKey::new("inbox")?;
//! let ts = NaiveDate::from_ymd_opt(2018, 3, 6).unwrap().and_hms_opt(21, 14, 0).unwrap();
//! let dataset = MessageDataset::new(vec![Message::new("Alice", None, ts)]);
//!
//! store.save(&dataset, &key)?;
//! assert_eq!(store.load(&key)?, dataset);
//! # Ok::<(), chatstats::StatsError>(())
//! ```

mod blob;

pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore};

use std::ffi::OsStr;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::config::ExtractorConfig;
use crate::datetime::DateTimeCodec;
use crate::error::{Result, StatsError};
use crate::message::{Message, MessageDataset};

/// Identifier of one cached dataset.
///
/// Keys are restricted to ASCII letters, digits, `.`, `_` and `-` so they
/// can be used directly as file names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoreKey(String);

impl StoreKey {
    /// Validates and wraps a key.
    ///
    /// ```rust
    /// use chatstats::store::StoreKey;
    ///
    /// assert!(StoreKey::new("messages_171").is_ok());
    /// assert!(StoreKey::new("../etc/passwd").is_err());
    /// ```
    pub fn new(key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
        if valid {
            Ok(Self(key))
        } else {
            Err(StatsError::invalid_config(format!("invalid store key '{key}'")))
        }
    }

    /// Derives the key for a source export extracted with `config`.
    ///
    /// The key is the sanitized file name followed by a digest of the
    /// file's absolute location and the extraction settings. Same-named
    /// exports in different folders, and runs with different settings,
    /// get different keys. The source does not need to exist.
    ///
    /// ```rust
    /// use chatstats::config::ExtractorConfig;
    /// use chatstats::store::StoreKey;
    /// use std::path::Path;
    ///
    /// let config = ExtractorConfig::new();
    /// let a = StoreKey::from_source(Path::new("alice/message_1.html"), &config)?;
    /// let b = StoreKey::from_source(Path::new("bob/message_1.html"), &config)?;
    ///
    /// assert!(a.as_str().starts_with("message_1.html-"));
    /// assert_ne!(a, b);
    /// # Ok::<(), chatstats::StatsError>(())
    /// ```
    pub fn from_source(path: &Path, config: &ExtractorConfig) -> Result<Self> {
        let name = path.file_name().ok_or_else(|| {
            StatsError::invalid_config(format!(
                "source path '{}' has no file name",
                path.display()
            ))
        })?;

        let sanitized: String = name
            .to_string_lossy()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        let stem: String = sanitized
            .trim_start_matches('.')
            .chars()
            .take(MAX_NAME_LEN)
            .collect();
        let stem = if stem.is_empty() { "source".to_string() } else { stem };

        let mut hasher = Sha256::new();
        hasher.update(source_location(path, name).to_string_lossy().as_bytes());
        hasher.update([0u8]);
        hasher.update(serde_json::to_vec(config)?);
        let digest = format!("{:x}", hasher.finalize());

        Self::new(format!("{stem}-{}", &digest[..DIGEST_LEN]))
    }

    /// Returns the key as a string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Absolute location of a source file.
///
/// The parent directory is canonicalized, the file itself is not, so the
/// location stays stable after the source is deleted.
fn source_location(path: &Path, name: &OsStr) -> PathBuf {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let dir = fs::canonicalize(parent)
        .or_else(|_| std::path::absolute(parent))
        .unwrap_or_else(|_| parent.to_path_buf());
    dir.join(name)
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// On-disk shape of a cached dataset.
#[derive(Debug, Serialize, Deserialize)]
struct StoredColumns {
    senders: Vec<String>,
    bodies: Vec<Option<String>>,
    dates: Vec<String>,
    times: Vec<String>,
}

/// Saves and loads [`MessageDataset`]s through a [`BlobStore`].
#[derive(Debug)]
pub struct RecordStore<B = FileBlobStore> {
    blobs: B,
    codec: DateTimeCodec,
}

/// Longest file-name prefix kept in a derived key.
const MAX_NAME_LEN: usize = 64;
/// Hex digits of the location digest kept in a derived key.
const DIGEST_LEN: usize = 16;

impl RecordStore<FileBlobStore> {
    /// Opens a file-backed store in `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        Self::new(FileBlobStore::new(dir))
    }
}

impl RecordStore<MemoryBlobStore> {
    /// Creates an empty in-memory store.
    pub fn in_memory() -> Self {
        Self::new(MemoryBlobStore::new())
    }
}

impl<B: BlobStore> RecordStore<B> {
    /// Wraps a blob store.
    pub fn new(blobs: B) -> Self {
        Self {
            blobs,
            codec: DateTimeCodec::new(),
        }
    }

    /// Returns the underlying blob store.
    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    /// Saves the four columns of `dataset` under `key`, replacing any
    /// earlier save.
    pub fn save(&self, dataset: &MessageDataset, key: &StoreKey) -> Result<()> {
        let columns = StoredColumns {
            senders: dataset.iter().map(|m| m.sender.clone()).collect(),
            bodies: dataset.iter().map(|m| m.text.clone()).collect(),
            dates: dataset
                .iter()
                .map(|m| self.codec.to_date_label(&m.timestamp))
                .collect(),
            times: dataset
                .iter()
                .map(|m| self.codec.to_time_label(&m.timestamp))
                .collect(),
        };

        let bytes = serde_json::to_vec(&columns)?;
        self.blobs.put(key, &bytes)?;
        info!(key = %key, messages = dataset.len(), bytes = bytes.len(), "dataset saved");
        Ok(())
    }

    /// Loads the dataset saved under `key`.
    ///
    /// # Errors
    ///
    /// - [`StatsError::NotFound`] if nothing was saved under `key`
    /// - [`StatsError::CorruptStore`] if the blob cannot be decoded
    pub fn load(&self, key: &StoreKey) -> Result<MessageDataset> {
        let Some(bytes) = self.blobs.get(key)? else {
            debug!(key = %key, "store miss");
            return Err(StatsError::not_found(key.as_str()));
        };

        let columns: StoredColumns = serde_json::from_slice(&bytes)
            .map_err(|err| StatsError::corrupt(key.as_str(), err.to_string()))?;

        let len = columns.senders.len();
        if columns.bodies.len() != len || columns.dates.len() != len || columns.times.len() != len
        {
            return Err(StatsError::corrupt(
                key.as_str(),
                format!(
                    "column lengths differ: senders={}, bodies={}, dates={}, times={}",
                    len,
                    columns.bodies.len(),
                    columns.dates.len(),
                    columns.times.len()
                ),
            ));
        }

        let mut messages = Vec::with_capacity(len);
        let rows = columns
            .senders
            .into_iter()
            .zip(columns.bodies)
            .zip(columns.dates.iter().zip(&columns.times));

        for (row, ((sender, text), (date, time))) in rows.enumerate() {
            let timestamp = self.codec.from_labels(date, time).map_err(|err| {
                StatsError::corrupt(key.as_str(), format!("row {row}: {err}"))
            })?;
            messages.push(Message::new(sender, text, timestamp));
        }

        info!(key = %key, messages = messages.len(), "dataset loaded");
        Ok(MessageDataset::new(messages))
    }

    /// Returns `true` if a dataset is saved under `key`.
    pub fn contains(&self, key: &StoreKey) -> Result<bool> {
        self.blobs.contains(key)
    }

    /// Drops the dataset saved under `key`. Returns `true` if one existed.
    pub fn remove(&self, key: &StoreKey) -> Result<bool> {
        self.blobs.remove(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::tempdir;

    fn at(y: i32, m: u32, d: u32, hh: u32, mm: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(hh, mm, 0)
            .unwrap()
    }

    fn sample() -> MessageDataset {
        MessageDataset::new(vec![
            Message::new("Bob", Some("latest".into()), at(2018, 3, 7, 9, 0)),
            Message::new("Alice", None, at(2018, 3, 6, 21, 14)),
            Message::new("Alice", Some("Привет 🎉".into()), at(2018, 3, 6, 8, 1)),
        ])
    }

    #[test]
    fn test_store_key_validation() {
        assert!(StoreKey::new("abc-123_x.html").is_ok());
        assert!(StoreKey::new("").is_err());
        assert!(StoreKey::new(".hidden").is_err());
        assert!(StoreKey::new("a/b").is_err());
        assert!(StoreKey::new("with space").is_err());
    }

    #[test]
    fn test_store_key_from_source() {
        let config = ExtractorConfig::new();
        let key = StoreKey::from_source(Path::new("/data/my chat (1).html"), &config).unwrap();
        assert!(key.as_str().starts_with("my_chat__1_.html-"));
        assert_eq!(key.as_str().len(), "my_chat__1_.html-".len() + DIGEST_LEN);
        assert!(StoreKey::from_source(Path::new("/"), &config).is_err());
    }

    #[test]
    fn test_store_key_is_stable() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("message_1.html");
        let config = ExtractorConfig::new();

        let before = StoreKey::from_source(&source, &config).unwrap();
        std::fs::write(&source, "<html></html>").unwrap();
        let existing = StoreKey::from_source(&source, &config).unwrap();
        std::fs::remove_file(&source).unwrap();
        let after = StoreKey::from_source(&source, &config).unwrap();

        assert_eq!(before, existing);
        assert_eq!(existing, after);
    }

    #[test]
    fn test_store_key_depends_on_directory() {
        let dir = tempdir().unwrap();
        let config = ExtractorConfig::new();
        let alice = StoreKey::from_source(&dir.path().join("alice/message_1.html"), &config).unwrap();
        let bob = StoreKey::from_source(&dir.path().join("bob/message_1.html"), &config).unwrap();
        assert_ne!(alice, bob);
    }

    #[test]
    fn test_store_key_depends_on_extraction_settings() {
        let source = Path::new("/data/message_1.html");
        let filtered = StoreKey::from_source(source, &ExtractorConfig::new()).unwrap();
        let with_attachments = StoreKey::from_source(
            source,
            &ExtractorConfig::new().with_include_attachments(true),
        )
        .unwrap();
        let other_class = StoreKey::from_source(
            source,
            &ExtractorConfig::new().with_thread_class("conversation"),
        )
        .unwrap();

        assert_ne!(filtered, with_attachments);
        assert_ne!(filtered, other_class);
        assert_eq!(filtered, StoreKey::from_source(source, &ExtractorConfig::new()).unwrap());
    }

    #[test]
    fn test_load_missing_key() {
        let store = RecordStore::in_memory();
        let err = store.load(&StoreKey::new("nothing").unwrap()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_memory_roundtrip() {
        let store = RecordStore::in_memory();
        let key = StoreKey::new("chat").unwrap();
        let dataset = sample();
        store.save(&dataset, &key).unwrap();
        assert_eq!(store.load(&key).unwrap(), dataset);
    }

    #[test]
    fn test_file_roundtrip_and_overwrite() {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path());
        let key = StoreKey::new("chat").unwrap();

        store.save(&sample(), &key).unwrap();
        assert_eq!(store.load(&key).unwrap(), sample());

        let smaller = MessageDataset::new(vec![Message::new(
            "Carol",
            Some("only one".into()),
            at(2019, 1, 1, 0, 0),
        )]);
        store.save(&smaller, &key).unwrap();
        assert_eq!(store.load(&key).unwrap(), smaller);
    }

    #[test]
    fn test_stored_layout() {
        let store = RecordStore::in_memory();
        let key = StoreKey::new("chat").unwrap();
        store.save(&sample(), &key).unwrap();

        let bytes = store.blobs().get(&key).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["senders"][0], "Bob");
        assert!(value["bodies"][1].is_null());
        assert_eq!(value["dates"][1], "06/03/18");
        assert_eq!(value["times"][1], "21:14");
    }

    #[test]
    fn test_empty_dataset_roundtrip() {
        let store = RecordStore::in_memory();
        let key = StoreKey::new("empty").unwrap();
        store.save(&MessageDataset::default(), &key).unwrap();
        assert!(store.load(&key).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_blob() {
        let store = RecordStore::in_memory();
        let key = StoreKey::new("bad").unwrap();
        store.blobs().put(&key, b"not json").unwrap();
        assert!(matches!(
            store.load(&key).unwrap_err(),
            StatsError::CorruptStore { .. }
        ));
    }

    #[test]
    fn test_mismatched_columns() {
        let store = RecordStore::in_memory();
        let key = StoreKey::new("bad").unwrap();
        let json = br#"{"senders":["A","B"],"bodies":[null],"dates":["01/01/20"],"times":["10:00"]}"#;
        store.blobs().put(&key, json).unwrap();
        let err = store.load(&key).unwrap_err();
        assert!(err.to_string().contains("column lengths differ"));
    }

    #[test]
    fn test_bad_label_in_store() {
        let store = RecordStore::in_memory();
        let key = StoreKey::new("bad").unwrap();
        let json = br#"{"senders":["A"],"bodies":["x"],"dates":["32/01/20"],"times":["10:00"]}"#;
        store.blobs().put(&key, json).unwrap();
        let err = store.load(&key).unwrap_err();
        assert!(err.to_string().contains("row 0"));
    }

    #[test]
    fn test_contains_and_remove() {
        let store = RecordStore::in_memory();
        let key = StoreKey::new("chat").unwrap();
        assert!(!store.contains(&key).unwrap());
        store.save(&sample(), &key).unwrap();
        assert!(store.contains(&key).unwrap());
        assert!(store.remove(&key).unwrap());
        assert!(store.load(&key).unwrap_err().is_not_found());
    }
}
