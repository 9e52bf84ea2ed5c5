//! Extracted message records and the dataset that holds them.
//!
//! A [`Message`] is one chat entry from the export: who sent it, its text
//! (absent for attachment-only entries), and when it was sent. A
//! [`MessageDataset`] is the ordered collection produced by one extraction.
//!
//! # Ordering
//!
//! The dataset keeps **document order**, which in the export is
//! reverse-chronological (most recent message first). Nothing in this crate
//! relies on that: chronological extremes are always found by comparing
//! dates, see [`MessageDataset::earliest_date`] and
//! [`MessageDataset::latest_date`].
//!
//! # Example
//!
//! ```
//! use chatstats::{Message, MessageDataset};
//! use chrono::NaiveDate;
//!
//! let ts = NaiveDate::from_ymd_opt(2018, 3, 6).unwrap().and_hms_opt(21, 14, 0).unwrap();
//! let dataset = MessageDataset::new(vec![
//!     Message::new("Alice", Some("See you tomorrow".into()), ts),
//!     Message::new("Bob", None, ts),
//! ]);
//!
//! assert_eq!(dataset.len(), 2);
//! assert_eq!(dataset.get(0).unwrap().date_label(), "06/03/18");
//! assert!(dataset.get(1).unwrap().is_attachment());
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Date label format, shared by [`Message::date_label`] and the codec.
pub(crate) const DATE_LABEL_FORMAT: &str = "%d/%m/%y";
/// Time label format, shared by [`Message::time_label`] and the codec.
pub(crate) const TIME_LABEL_FORMAT: &str = "%H:%M";

/// One extracted chat entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Display name of the sender.
    pub sender: String,

    /// Message body, or `None` for attachment-only entries.
    #[serde(default)]
    pub text: Option<String>,

    /// When the message was sent, in the export's wall-clock time.
    ///
    /// Minute precision: the export carries no seconds.
    pub timestamp: NaiveDateTime,
}

impl Message {
    /// Creates a message.
    pub fn new(sender: impl Into<String>, text: Option<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            sender: sender.into(),
            text,
            timestamp,
        }
    }

    /// Returns the sender name.
    pub fn sender(&self) -> &str {
        &self.sender
    }

    /// Returns the message body, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Returns the timestamp.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Returns the calendar date of the message.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    /// Returns the `dd/mm/yy` group-by key.
    pub fn date_label(&self) -> String {
        self.timestamp.format(DATE_LABEL_FORMAT).to_string()
    }

    /// Returns the `HH:MM` group-by key.
    pub fn time_label(&self) -> String {
        self.timestamp.format(TIME_LABEL_FORMAT).to_string()
    }

    /// Returns `true` if the entry has no text body.
    pub fn is_attachment(&self) -> bool {
        self.text.is_none()
    }

    /// Number of whitespace-delimited words in the body (0 for attachments).
    pub fn word_count(&self) -> usize {
        self.text
            .as_deref()
            .map(|text| text.split_whitespace().count())
            .unwrap_or(0)
    }
}

/// Ordered, immutable collection of extracted messages.
///
/// See the [module documentation](self) for the ordering invariant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageDataset {
    messages: Vec<Message>,
}

impl MessageDataset {
    /// Wraps messages in document order.
    pub fn new(messages: Vec<Message>) -> Self {
        Self { messages }
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns `true` if the dataset holds no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns the message at `index` in document order.
    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    /// Iterates in document order.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    /// Read-only view of all messages.
    pub fn as_slice(&self) -> &[Message] {
        &self.messages
    }

    /// Chronologically earliest message date, by comparison.
    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.messages.iter().map(Message::date).min()
    }

    /// Chronologically latest message date, by comparison.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.messages.iter().map(Message::date).max()
    }

    /// Sender column.
    pub fn senders(&self) -> Vec<&str> {
        self.messages.iter().map(Message::sender).collect()
    }

    /// Body column.
    pub fn bodies(&self) -> Vec<Option<&str>> {
        self.messages.iter().map(Message::text).collect()
    }

    /// Date label column.
    pub fn date_labels(&self) -> Vec<String> {
        self.messages.iter().map(Message::date_label).collect()
    }

    /// Time label column.
    pub fn time_labels(&self) -> Vec<String> {
        self.messages.iter().map(Message::time_label).collect()
    }
}

impl From<Vec<Message>> for MessageDataset {
    fn from(messages: Vec<Message>) -> Self {
        Self::new(messages)
    }
}

impl FromIterator<Message> for MessageDataset {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MessageDataset {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}
