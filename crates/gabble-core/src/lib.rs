//! Session-and-message-log core for Gabble.
//!
//! This crate owns the shared chat state and the rules around it: session
//! admission and identity (`registry`), the append-only message log with
//! its visibility filter (`log`), the serialized room facade composing
//! the two (`room`), and the client-side polling watcher with its
//! transport port (`watcher`).
//!
//! It depends only on `gabble-types` and the async runtime -- never on
//! the HTTP layer. Transport implementations live in `gabble-api`.

pub mod log;
pub mod registry;
pub mod room;
pub mod watcher;
