//! Chat log entry type and the visibility rule.
//!
//! The wire protocol is plain text: every stored line renders as
//! `"(sender) body"`, with private addressing expressed by a trailing
//! `"/ name"` token (`"(alice) hi / bob"`). Internally the addressee is
//! kept as a structured field rather than re-parsed out of the rendered
//! text, but parsing on append and rendering on read preserve the text
//! convention exactly.

use serde::{Deserialize, Serialize};

use std::fmt;

/// One immutable line in the shared, append-only message log.
///
/// System lines (arrivals, departures) are ordinary public entries whose
/// sender is the participant the line is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Name of the participant this entry is from (or about).
    pub sender: String,
    /// Addressee for private entries. `None` means public.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<String>,
    /// Message text, without the sender prefix or addressee suffix.
    pub body: String,
}

impl LogEntry {
    /// Create a public entry (no addressee).
    pub fn public(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            recipient: None,
            body: body.into(),
        }
    }

    /// Parse a posted message into an entry, honoring the addressee
    /// convention: everything after the first `/` names the recipient.
    ///
    /// A `/` followed by only whitespace is not an address; the text is
    /// stored verbatim as a public entry.
    pub fn from_post(sender: impl Into<String>, text: &str) -> Self {
        if let Some((body, addressee)) = text.split_once('/') {
            let addressee = addressee.trim();
            if !addressee.is_empty() {
                return Self {
                    sender: sender.into(),
                    recipient: Some(addressee.to_string()),
                    body: body.trim_end().to_string(),
                };
            }
        }
        Self::public(sender, text)
    }

    /// Whether `reader` may see this entry.
    ///
    /// Public entries are visible to everyone. Addressed entries are
    /// visible only to the addressee and to the sender themselves.
    pub fn visible_to(&self, reader: &str) -> bool {
        match &self.recipient {
            None => true,
            Some(recipient) => recipient == reader || self.sender == reader,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.recipient {
            None => write!(f, "({}) {}", self.sender, self.body),
            Some(recipient) => write!(f, "({}) {} / {}", self.sender, self.body, recipient),
        }
    }
}
