//! Append-only message log with the visibility filter.
//!
//! The log is a plain `Vec` shared by every session; per-session read
//! positions live on the sessions themselves as cursors. Private entries
//! piggyback on the one public log and are filtered out per reader at
//! read time, so there is no second data structure to keep consistent.

use gabble_types::entry::LogEntry;

/// The shared, append-only sequence of chat entries.
#[derive(Debug, Default)]
pub struct MessageLog {
    entries: Vec<LogEntry>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry. Entries are immutable once stored.
    pub fn append(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    /// Render the entries visible to `reader` from `cursor` to the end.
    ///
    /// Returns the rendered lines and the new cursor, which is always the
    /// log length at call time: filtered-out private entries are skipped
    /// past too and never revisited on later reads.
    pub fn since(&self, cursor: usize, reader: &str) -> (Vec<String>, usize) {
        let lines = self.entries[cursor..]
            .iter()
            .filter(|entry| entry.visible_to(reader))
            .map(LogEntry::to_string)
            .collect();
        (lines, self.entries.len())
    }

    /// Truncate to empty. Invoked under the lazy-clear rule: by the first
    /// joiner into an empty room, not by the last leaver.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since_returns_entries_from_cursor() {
        let mut log = MessageLog::new();
        log.append(LogEntry::public("alice", "one"));
        log.append(LogEntry::public("alice", "two"));
        log.append(LogEntry::public("alice", "three"));

        let (lines, cursor) = log.since(1, "bob");
        assert_eq!(lines, ["(alice) two", "(alice) three"]);
        assert_eq!(cursor, 3);

        let (lines, cursor) = log.since(cursor, "bob");
        assert!(lines.is_empty());
        assert_eq!(cursor, 3);
    }

    #[test]
    fn test_cursor_advances_past_filtered_private_entries() {
        let mut log = MessageLog::new();
        log.append(LogEntry::from_post("alice", "secret / bob"));
        log.append(LogEntry::public("alice", "hello all"));

        let (lines, cursor) = log.since(0, "carol");
        assert_eq!(lines, ["(alice) hello all"]);
        // The private entry is skipped forever, not held back.
        assert_eq!(cursor, 2);
    }

    #[test]
    fn test_private_entry_visible_to_addressee_and_author() {
        let mut log = MessageLog::new();
        log.append(LogEntry::from_post("alice", "hi / bob"));

        let (for_bob, _) = log.since(0, "bob");
        let (for_alice, _) = log.since(0, "alice");
        let (for_carol, _) = log.since(0, "carol");
        assert_eq!(for_bob, ["(alice) hi / bob"]);
        assert_eq!(for_alice, ["(alice) hi / bob"]);
        assert!(for_carol.is_empty());
    }

    #[test]
    fn test_clear_truncates() {
        let mut log = MessageLog::new();
        log.append(LogEntry::public("alice", "has arrived"));
        log.clear();
        assert!(log.is_empty());
        let (lines, cursor) = log.since(0, "alice");
        assert!(lines.is_empty());
        assert_eq!(cursor, 0);
    }
}
