//! Session and identity token types.
//!
//! A `Session` is one participant's server-side identity record: display
//! name, the opaque token issued at join time, and the read cursor into
//! the shared message log.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Opaque identity credential issued at join time.
///
/// Stands in for a password on every subsequent operation by the same
/// participant. The wire form is the bare integer (e.g. a `uid` cookie
/// value); a value that fails to parse is treated as absent identity by
/// the transport layer, never as an error surfaced to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(pub u32);

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionToken {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(SessionToken)
    }
}

/// One logged-in participant.
///
/// Created by a successful join, destroyed by an explicit leave. The
/// cursor marks "read up to here" into the shared log: it starts at the
/// log length at join time (a session never back-reads history from
/// before it joined), only grows, and never exceeds the log length.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Display name, unique among currently active sessions.
    pub name: String,
    /// Identity token issued at join time.
    pub token: SessionToken,
    /// Index of the next unread log entry for this session.
    pub cursor: usize,
}

impl Session {
    /// Exact name+token match, required by every authenticated operation.
    pub fn matches(&self, name: &str, token: SessionToken) -> bool {
        self.name == name && self.token == token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_display_parse_roundtrip() {
        let token = SessionToken(482);
        let parsed: SessionToken = token.to_string().parse().unwrap();
        assert_eq!(parsed, token);
    }

    #[test]
    fn test_token_parse_rejects_garbage() {
        assert!("".parse::<SessionToken>().is_err());
        assert!("abc".parse::<SessionToken>().is_err());
        assert!("-1".parse::<SessionToken>().is_err());
    }

    #[test]
    fn test_token_serde_transparent() {
        let json = serde_json::to_string(&SessionToken(7)).unwrap();
        assert_eq!(json, "7");
    }

    #[test]
    fn test_session_matches_requires_both_fields() {
        let session = Session {
            name: "alice".to_string(),
            token: SessionToken(42),
            cursor: 0,
        };
        assert!(session.matches("alice", SessionToken(42)));
        assert!(!session.matches("alice", SessionToken(43)));
        assert!(!session.matches("bob", SessionToken(42)));
    }
}
