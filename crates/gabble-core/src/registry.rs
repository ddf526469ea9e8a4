//! Active session registry: admission, identity, and the roster.
//!
//! Sessions are kept in registration order in a `Vec`; the roster and the
//! `who` listing depend on that order. Token allocation draws random
//! integers from a bounded space and retries until the candidate is
//! unused among currently active sessions, so two live sessions can never
//! share a token.

use gabble_types::error::ChatError;
use gabble_types::session::{Session, SessionToken};
use rand::Rng;
use tracing::debug;

/// Exclusive upper bound of the token space. Tokens are `1..TOKEN_SPACE`.
const TOKEN_SPACE: u32 = 10_000;

/// The set of currently active sessions.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Vec<Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a new session, allocating a collision-free token.
    ///
    /// `cursor` is the log length at join time, so the session never
    /// back-reads history from before it joined. Fails if the name
    /// already belongs to an active session; names are only unique among
    /// *currently* active sessions, so a departed name may rejoin.
    pub fn join(&mut self, name: &str, cursor: usize) -> Result<SessionToken, ChatError> {
        if self.sessions.iter().any(|s| s.name == name) {
            return Err(ChatError::DuplicateName(name.to_string()));
        }
        let token = self.allocate_token();
        self.sessions.push(Session {
            name: name.to_string(),
            token,
            cursor,
        });
        debug!(%name, %token, "session joined");
        Ok(token)
    }

    /// Remove a session. Requires an exact name+token match.
    pub fn leave(&mut self, name: &str, token: SessionToken) -> Result<(), ChatError> {
        let index = self
            .sessions
            .iter()
            .position(|s| s.matches(name, token))
            .ok_or(ChatError::UnknownSession)?;
        self.sessions.remove(index);
        debug!(%name, "session left");
        Ok(())
    }

    /// Look up a session by exact name+token match.
    ///
    /// Backs every authenticated operation; a miss covers never-joined,
    /// wrong-token, and already-departed alike.
    pub fn find_mut(&mut self, name: &str, token: SessionToken) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.matches(name, token))
    }

    /// Active session names, in registration order.
    pub fn roster(&self) -> impl Iterator<Item = &str> {
        self.sessions.iter().map(|s| s.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Draw random tokens until one is unused by any active session.
    ///
    /// Terminates because the token space is far larger than any
    /// plausible session count.
    fn allocate_token(&self) -> SessionToken {
        let mut rng = rand::thread_rng();
        loop {
            let candidate = SessionToken(rng.gen_range(1..TOKEN_SPACE));
            if !self.sessions.iter().any(|s| s.token == candidate) {
                return candidate;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_records_cursor_and_order() {
        let mut registry = SessionRegistry::new();
        registry.join("alice", 0).unwrap();
        registry.join("bob", 3).unwrap();
        let names: Vec<&str> = registry.roster().collect();
        assert_eq!(names, ["alice", "bob"]);
        let token = registry.join("carol", 5).unwrap();
        assert_eq!(registry.find_mut("carol", token).unwrap().cursor, 5);
    }

    #[test]
    fn test_duplicate_name_rejected_while_active() {
        let mut registry = SessionRegistry::new();
        let token = registry.join("alice", 0).unwrap();
        assert_eq!(
            registry.join("alice", 0),
            Err(ChatError::DuplicateName("alice".to_string()))
        );
        registry.leave("alice", token).unwrap();
        // Names are only unique among active sessions.
        assert!(registry.join("alice", 0).is_ok());
    }

    #[test]
    fn test_leave_requires_exact_token() {
        let mut registry = SessionRegistry::new();
        let token = registry.join("alice", 0).unwrap();
        let wrong = SessionToken(token.0.wrapping_add(1));
        assert_eq!(registry.leave("alice", wrong), Err(ChatError::UnknownSession));
        assert_eq!(registry.len(), 1);
        assert!(registry.leave("alice", token).is_ok());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_find_misses_departed_session() {
        let mut registry = SessionRegistry::new();
        let token = registry.join("alice", 0).unwrap();
        registry.leave("alice", token).unwrap();
        assert!(registry.find_mut("alice", token).is_none());
    }

    #[test]
    fn test_tokens_unique_among_active_sessions() {
        let mut registry = SessionRegistry::new();
        let mut tokens = Vec::new();
        for i in 0..200 {
            tokens.push(registry.join(&format!("user{i}"), 0).unwrap());
        }
        let mut deduped = tokens.clone();
        deduped.sort_by_key(|t| t.0);
        deduped.dedup();
        assert_eq!(deduped.len(), tokens.len());
    }
}
