//! Application state shared by all request handlers.

use gabble_core::room::SharedRoom;

/// Shared application state: the single global chat room.
///
/// Cloned into every handler by axum; all clones serialize through the
/// room's one lock.
#[derive(Clone, Default)]
pub struct AppState {
    pub room: SharedRoom,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
