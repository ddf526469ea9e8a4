//! The chat room: session registry and message log behind one lock.
//!
//! `ChatRoom` composes the registry and the log and exposes the five
//! operations of the protocol. It is a plain synchronous struct so the
//! invariants are easy to test; `SharedRoom` wraps it in an async mutex
//! for the many concurrent request handlers. Every operation is atomic
//! with respect to every other -- one coarse lock over the whole state,
//! no per-session locking. Nothing under the lock does I/O.

use std::fmt::Write as _;
use std::sync::Arc;

use gabble_types::entry::LogEntry;
use gabble_types::error::ChatError;
use gabble_types::session::SessionToken;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::log::MessageLog;
use crate::registry::SessionRegistry;

/// The single shared room: all sessions, one global message log.
#[derive(Debug, Default)]
pub struct ChatRoom {
    registry: SessionRegistry,
    log: MessageLog,
}

impl ChatRoom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the room.
    ///
    /// The first joiner into an empty room clears the leftover log (lazy
    /// clear: the last leaver does *not* clear it). The new session's
    /// cursor is the log length at join time, captured before the arrival
    /// entry is appended, so the joiner's first read starts at their own
    /// arrival line.
    pub fn add_user(&mut self, name: &str) -> Result<SessionToken, ChatError> {
        if self.registry.is_empty() {
            self.log.clear();
        }
        let token = self.registry.join(name, self.log.len())?;
        self.log.append(LogEntry::public(name, "has arrived"));
        info!(%name, "user joined the room");
        Ok(token)
    }

    /// Leave the room. Appends the departure entry on success.
    pub fn del_user(&mut self, name: &str, token: SessionToken) -> Result<(), ChatError> {
        self.registry.leave(name, token)?;
        self.log.append(LogEntry::public(name, "has departed"));
        info!(%name, "user left the room");
        Ok(())
    }

    /// Store a message from an authenticated session.
    ///
    /// The addressee convention in `text` is parsed here so the log's
    /// visibility filter can act on it.
    pub fn store_message(
        &mut self,
        name: &str,
        token: SessionToken,
        text: &str,
    ) -> Result<(), ChatError> {
        self.registry
            .find_mut(name, token)
            .ok_or(ChatError::UnknownSession)?;
        self.log.append(LogEntry::from_post(name, text));
        debug!(%name, "message stored");
        Ok(())
    }

    /// Read everything visible to the session since its last read.
    ///
    /// Advances the cursor to the log length regardless of how many
    /// entries were filtered out. Empty text is a successful read;
    /// failure is reserved for an unknown session.
    pub fn read(&mut self, name: &str, token: SessionToken) -> Result<String, ChatError> {
        let session = self
            .registry
            .find_mut(name, token)
            .ok_or(ChatError::UnknownSession)?;
        let (lines, new_cursor) = self.log.since(session.cursor, name);
        session.cursor = new_cursor;
        let mut out = String::new();
        for line in lines {
            out.push_str(&line);
            out.push('\n');
        }
        Ok(out)
    }

    /// The numbered roster, e.g. `"1. alice\n2. bob\n"`.
    ///
    /// Always succeeds; an empty room yields empty text.
    pub fn who(&self) -> String {
        let mut out = String::new();
        for (i, name) in self.registry.roster().enumerate() {
            let _ = writeln!(out, "{}. {name}", i + 1);
        }
        out
    }

    /// Number of currently active sessions.
    pub fn session_count(&self) -> usize {
        self.registry.len()
    }

    /// Current log length, including entries not visible to everyone.
    pub fn log_len(&self) -> usize {
        self.log.len()
    }
}

/// Cloneable handle serializing all room operations behind one lock.
///
/// Each inbound request runs as its own task; the mutex guarantees
/// mutual exclusion across the entire operation set, so the lazy-clear
/// check never races a concurrent append and a name-uniqueness check
/// never races a concurrent join. Lock hold times are short: all work is
/// in-memory and bounded by current session and message counts.
#[derive(Debug, Clone, Default)]
pub struct SharedRoom {
    inner: Arc<Mutex<ChatRoom>>,
}

impl SharedRoom {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, name: &str) -> Result<SessionToken, ChatError> {
        self.inner.lock().await.add_user(name)
    }

    pub async fn del_user(&self, name: &str, token: SessionToken) -> Result<(), ChatError> {
        self.inner.lock().await.del_user(name, token)
    }

    pub async fn store_message(
        &self,
        name: &str,
        token: SessionToken,
        text: &str,
    ) -> Result<(), ChatError> {
        self.inner.lock().await.store_message(name, token, text)
    }

    pub async fn read(&self, name: &str, token: SessionToken) -> Result<String, ChatError> {
        self.inner.lock().await.read(name, token)
    }

    pub async fn who(&self) -> String {
        self.inner.lock().await.who()
    }
}
