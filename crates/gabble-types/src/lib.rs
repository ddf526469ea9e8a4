//! Shared domain types for Gabble.
//!
//! This crate contains the core domain types used across the Gabble chat
//! system: sessions, identity tokens, log entries, and their error types.
//!
//! Zero infrastructure dependencies -- only serde and thiserror.

pub mod entry;
pub mod error;
pub mod session;
