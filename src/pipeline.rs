//! Source file to dataset, with the record store as a write-through cache.
//!
//! # Example
//!
//! ```rust,no_run
//! use chatstats::config::PipelineConfig;
//! use chatstats::pipeline::Pipeline;
//! use std::path::Path;
//!
//! let pipeline = Pipeline::new(PipelineConfig::new().with_store_dir("/tmp/chatstats"));
//!
//! // First run extracts the HTML and saves it; later runs load the cache.
//! let dataset = pipeline.load_dataset(Path::new("messages/inbox.html"))?;
//! println!("{} messages", dataset.len());
//! # Ok::<(), chatstats::StatsError>(())
//! ```

use std::path::Path;

use tracing::{info, instrument};

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::extract::RecordExtractor;
use crate::message::MessageDataset;
use crate::progress::ProgressCallback;
use crate::store::{BlobStore, FileBlobStore, RecordStore, StoreKey};

/// Loads datasets from exports, caching extraction results.
#[derive(Debug)]
pub struct Pipeline<B = FileBlobStore> {
    config: PipelineConfig,
    extractor: RecordExtractor,
    store: RecordStore<B>,
}

impl Pipeline<FileBlobStore> {
    /// Creates a pipeline caching into `config.store_dir`.
    pub fn new(config: PipelineConfig) -> Self {
        let store = RecordStore::new(FileBlobStore::new(config.store_dir.clone()));
        Self::with_store(config, store)
    }
}

impl<B: BlobStore> Pipeline<B> {
    /// Creates a pipeline over an existing store. `config.store_dir` is ignored.
    pub fn with_store(config: PipelineConfig, store: RecordStore<B>) -> Self {
        let extractor = RecordExtractor::with_config(config.extractor.clone());
        Self {
            config,
            extractor,
            store,
        }
    }

    /// Reports extraction progress through `callback`.
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.extractor = self.extractor.with_progress(callback);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    /// Store key used for `source` under this pipeline's extraction settings.
    pub fn key_for(&self, source: &Path) -> Result<StoreKey> {
        StoreKey::from_source(source, &self.config.extractor)
    }

    /// Returns the dataset for `source`.
    ///
    /// With caching enabled, a dataset saved for the same source file and
    /// extraction settings is loaded instead of re-extracting. Otherwise, or on a store miss, the
    /// file is extracted and the result saved.
    ///
    /// A stored dataset that fails to decode is an error; delete it or run
    /// with caching disabled to rebuild it.
    #[instrument(skip(self, source), fields(source = %source.display()))]
    pub fn load_dataset(&self, source: &Path) -> Result<MessageDataset> {
        let key = self.key_for(source)?;

        if self.config.use_cache {
            match self.store.load(&key) {
                Ok(dataset) => {
                    info!(key = %key, messages = dataset.len(), "using cached dataset");
                    return Ok(dataset);
                }
                Err(err) if err.is_not_found() => {
                    info!(key = %key, "no cached dataset, extracting");
                }
                Err(err) => return Err(err),
            }
        } else {
            info!(key = %key, "cache disabled, extracting");
        }

        let dataset = self.extractor.extract_file(source)?;
        self.store.save(&dataset, &key)?;
        Ok(dataset)
    }
}
