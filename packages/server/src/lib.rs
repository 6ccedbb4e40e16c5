//! Realtime room-based code collaboration relay.
//!
//! Clients join named rooms over WebSocket, receive the roster and slot profiles,
//! and share a single text buffer per room that is relayed to every other member.

pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
