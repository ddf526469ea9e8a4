//! HTTP layer for the chat protocol.
//!
//! Axum routes speaking the plain-text poll protocol: `ok` / `no`
//! acknowledgements, identity carried as a `uid` cookie issued on join.

pub mod handlers;
pub mod router;
