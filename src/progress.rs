//! Progress reporting for extraction runs.
//!
//! Large exports can hold hundreds of threads. The extractor calls an
//! optional [`ProgressCallback`] after each thread so that a front-end can
//! show how far the walk has got.
//!
//! # Example
//!
//! ```rust
//! use chatstats::extract::RecordExtractor;
//! use chatstats::progress::{Progress, ProgressCallback};
//! use std::sync::Arc;
//!
//! let callback: ProgressCallback = Arc::new(|progress: Progress| {
//!     if let Some(pct) = progress.percentage() {
//!         println!("Threads: {:.0}%", pct);
//!     }
//! });
//!
//! let extractor = RecordExtractor::new().with_progress(callback);
//! # let _ = extractor;
//! ```

use std::fmt;
use std::sync::Arc;

/// Snapshot of an extraction run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Threads fully walked so far.
    pub threads_processed: usize,

    /// Number of threads in the document.
    pub total_threads: usize,

    /// Messages kept so far (after attachment filtering).
    pub messages_extracted: usize,
}

impl Progress {
    /// Creates a progress snapshot.
    pub fn new(threads_processed: usize, total_threads: usize, messages_extracted: usize) -> Self {
        Self {
            threads_processed,
            total_threads,
            messages_extracted,
        }
    }

    /// Returns the thread progress as a percentage (0.0 - 100.0).
    ///
    /// Returns `None` for a document without threads.
    ///
    /// ```rust
    /// use chatstats::progress::Progress;
    ///
    /// assert_eq!(Progress::new(1, 4, 10).percentage(), Some(25.0));
    /// assert_eq!(Progress::new(0, 0, 0).percentage(), None);
    /// ```
    pub fn percentage(&self) -> Option<f64> {
        if self.total_threads == 0 {
            None
        } else {
            Some((self.threads_processed as f64 / self.total_threads as f64) * 100.0)
        }
    }

    /// Returns whether every thread has been walked.
    pub fn is_complete(&self) -> bool {
        self.threads_processed >= self.total_threads
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Threads: {}/{}", self.threads_processed, self.total_threads)?;
        if let Some(pct) = self.percentage() {
            write!(f, " ({pct:.1}%)")?;
        }
        write!(f, ", {} messages", self.messages_extracted)
    }
}

/// Callback type for receiving progress updates.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Creates a progress callback that prints one line per thread to stderr.
pub fn stderr_progress() -> ProgressCallback {
    Arc::new(|progress| eprintln!("{progress}"))
}
