//! Facebook Messenger HTML export extractor.
//!
//! The export is one HTML document. Conversations are containers classed
//! `thread`; each chat entry is an element classed `message` whose header
//! holds the sender (`user`) and the timestamp (`meta`). The body is the
//! element that immediately follows the entry:
//!
//! ```html
//! <div class="thread">
//!   <div class="message">
//!     <div class="message_header">
//!       <span class="user">Alice</span>
//!       <span class="meta">Tuesday, 6 March 2018 at 21:14 UTC+01</span>
//!     </div>
//!   </div>
//!   <p>See you tomorrow</p>
//! </div>
//! ```
//!
//! Photos, stickers and files leave a body without a single text run; those
//! entries carry `text: None` and are dropped unless
//! [`ExtractorConfig::include_attachments`] is set.
//!
//! Extraction is all-or-nothing: the first malformed entry aborts the run
//! with [`StatsError::Parse`].

use std::fmt;
use std::fs;
use std::path::Path;

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, info, instrument, trace};

use crate::config::ExtractorConfig;
use crate::datetime::DateTimeCodec;
use crate::error::{Result, StatsError};
use crate::message::{Message, MessageDataset};
use crate::progress::{Progress, ProgressCallback};

/// Walks an export document and produces a [`MessageDataset`].
///
/// # Example
///
/// ```rust
/// use chatstats::extract::RecordExtractor;
///
/// let html = r#"<div class="thread">
///   <div class="message"><div class="message_header">
///     <span class="user">Alice</span>
///     <span class="meta">Tuesday, 6 March 2018 at 21:14 UTC+01</span>
///   </div></div>
///   <p>See you tomorrow</p>
/// </div>"#;
///
/// let dataset = RecordExtractor::new().extract_str(html)?;
/// assert_eq!(dataset.len(), 1);
/// assert_eq!(dataset.get(0).unwrap().text(), Some("See you tomorrow"));
/// # Ok::<(), chatstats::StatsError>(())
/// ```
pub struct RecordExtractor {
    config: ExtractorConfig,
    codec: DateTimeCodec,
    progress: Option<ProgressCallback>,
}

impl RecordExtractor {
    /// Creates an extractor with default configuration.
    pub fn new() -> Self {
        Self::with_config(ExtractorConfig::default())
    }

    /// Creates an extractor with custom configuration.
    pub fn with_config(config: ExtractorConfig) -> Self {
        let codec = DateTimeCodec::with_config(config.codec.clone());
        Self {
            config,
            codec,
            progress: None,
        }
    }

    /// Reports progress after every thread.
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Returns the current configuration.
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Reads and extracts an export file (UTF-8).
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn extract_file(&self, path: &Path) -> Result<MessageDataset> {
        let content = fs::read_to_string(path)?;
        self.extract_str(&content)
    }

    /// Parses and extracts an export held in memory.
    pub fn extract_str(&self, html: &str) -> Result<MessageDataset> {
        let document = Html::parse_document(html);
        self.extract(&document)
    }

    /// Extracts every message from an already-parsed document.
    ///
    /// The document is not modified; calling this twice yields the same
    /// dataset.
    pub fn extract(&self, document: &Html) -> Result<MessageDataset> {
        let selectors = Selectors::build(&self.config)?;

        let threads: Vec<ElementRef<'_>> = document.select(&selectors.thread).collect();
        let total_threads = threads.len();
        info!(threads = total_threads, "extracting messages");

        let mut messages = Vec::new();
        let mut skipped = 0usize;

        for (thread_idx, thread) in threads.into_iter().enumerate() {
            let before = messages.len();

            for (entry_idx, entry) in thread.select(&selectors.message).enumerate() {
                let message = self.extract_entry(entry, &selectors, thread_idx, entry_idx)?;

                if message.is_attachment() && !self.config.include_attachments {
                    trace!(thread = thread_idx, entry = entry_idx, "skipping attachment entry");
                    skipped += 1;
                    continue;
                }

                messages.push(message);
            }

            debug!(
                thread = thread_idx,
                messages = messages.len() - before,
                "thread extracted"
            );

            if let Some(callback) = &self.progress {
                callback(Progress::new(thread_idx + 1, total_threads, messages.len()));
            }
        }

        info!(
            messages = messages.len(),
            skipped_attachments = skipped,
            "extraction complete"
        );

        Ok(MessageDataset::new(messages))
    }

    fn extract_entry(
        &self,
        entry: ElementRef<'_>,
        selectors: &Selectors,
        thread: usize,
        index: usize,
    ) -> Result<Message> {
        let sender = entry
            .select(&selectors.user)
            .next()
            .and_then(|user| string_content(*user))
            .ok_or_else(|| StatsError::parse(thread, index, "missing sender"))?;

        let raw_timestamp = entry
            .select(&selectors.meta)
            .next()
            .and_then(|meta| string_content(*meta))
            .ok_or_else(|| StatsError::parse(thread, index, "missing timestamp"))?;

        let timestamp = self
            .codec
            .parse(&raw_timestamp)
            .map_err(|err| StatsError::parse(thread, index, err.to_string()))?;

        let text = adjacent_body(entry);

        Ok(Message::new(sender, text, timestamp))
    }
}

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordExtractor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordExtractor")
            .field("config", &self.config)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Compiled class selectors for one extraction run.
struct Selectors {
    thread: Selector,
    message: Selector,
    user: Selector,
    meta: Selector,
}

impl Selectors {
    fn build(config: &ExtractorConfig) -> Result<Self> {
        Ok(Self {
            thread: class_selector(&config.thread_class)?,
            message: class_selector(&config.message_class)?,
            user: class_selector(&config.user_class)?,
            meta: class_selector(&config.meta_class)?,
        })
    }
}

fn class_selector(class: &str) -> Result<Selector> {
    if class.is_empty() || class.chars().any(char::is_whitespace) {
        return Err(StatsError::invalid_config(format!(
            "invalid class name '{class}'"
        )));
    }
    Selector::parse(&format!(".{class}")).map_err(|err| {
        StatsError::invalid_config(format!("invalid class name '{class}': {err:?}"))
    })
}

/// Text of a node that reduces to a single text run.
///
/// A text node yields its text. An element with exactly one child yields
/// that child's content. Anything else (no children, several children,
/// comments) yields `None`.
fn string_content(node: NodeRef<'_, Node>) -> Option<String> {
    match node.value() {
        Node::Text(text) => Some(String::from(&**text)),
        Node::Element(_) => {
            let mut children = node.children();
            let only = children.next()?;
            if children.next().is_some() {
                return None;
            }
            string_content(only)
        }
        _ => None,
    }
}

/// Body of an entry: content of the next non-blank sibling.
fn adjacent_body(entry: ElementRef<'_>) -> Option<String> {
    let sibling = entry.next_siblings().find(|node| match node.value() {
        Node::Text(text) => !text.trim().is_empty(),
        Node::Element(_) => true,
        _ => false,
    })?;
    string_content(sibling)
}
