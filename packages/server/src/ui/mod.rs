//! Axum front end: routes, WebSocket session loop and the room hub.

mod handler;
pub mod hub;
mod server;
mod signal;
pub mod state;

pub use hub::{HubCommand, HubError, RoomHub, RoomHubHandle};
pub use server::{Server, ServerError, build_router, cors_layer};
pub use signal::shutdown_signal;
