use thiserror::Error;

/// Errors from chat room operations.
///
/// The protocol deliberately collapses all three causes into the same
/// negative acknowledgement on the wire (`no`); the distinction exists
/// only for internal logging and tests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    #[error("name '{0}' already belongs to an active session")]
    DuplicateName(String),

    #[error("no active session matches the given name and token")]
    UnknownSession,

    #[error("identity token absent or malformed")]
    InvalidIdentity,
}

/// Errors from the client-side transport port.
///
/// The polling watcher treats any of these as terminal: a rejected join
/// ends the client before the loop starts, and a transport failure while
/// polling ends the loop with a single diagnostic line.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request rejected by the server")]
    Rejected,

    #[error("transport failure: {0}")]
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_error_display() {
        let err = ChatError::DuplicateName("alice".to_string());
        assert_eq!(
            err.to_string(),
            "name 'alice' already belongs to an active session"
        );
    }

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Failed("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }
}
