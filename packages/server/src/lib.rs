//! Room-based WebSocket chat relay library.
//!
//! Clients join named rooms over WebSocket, post short text messages and
//! receive every message posted to their room, starting with the most recent
//! history on join. Rooms live in process memory and disappear with their last
//! subscriber.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
