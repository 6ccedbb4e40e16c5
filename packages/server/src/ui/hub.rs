//! Room hub: the single task that owns the [`RoomManager`].
//!
//! Every inbound event (connect, client frame, disconnect, HTTP snapshot) is sent to the
//! hub over one channel and handled to completion, broadcasts included, before the next
//! one is taken. Room state therefore needs no locks.
//!
//! A panic while handling one command is contained here and logged; the hub keeps
//! serving other rooms and connections.

use std::panic::{AssertUnwindSafe, catch_unwind};

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

use crate::{
    domain::{ConnectionId, PusherChannel, Room},
    infrastructure::dto::websocket::ClientEvent,
    usecase::{GetRoomDetailError, RoomManager},
};

/// Commands processed sequentially by the hub
#[derive(Debug)]
pub enum HubCommand {
    /// A WebSocket connection was established
    Connect {
        connection_id: ConnectionId,
        sender: PusherChannel,
    },
    /// A parsed frame from a connection
    ClientEvent {
        connection_id: ConnectionId,
        event: ClientEvent,
    },
    /// The WebSocket connection was closed
    Disconnect { connection_id: ConnectionId },
    /// Snapshot of every room
    GetRooms {
        responder: oneshot::Sender<Vec<Room>>,
    },
    /// Snapshot of one room
    GetRoomDetail {
        room_id: String,
        responder: oneshot::Sender<Result<Room, GetRoomDetailError>>,
    },
}

impl HubCommand {
    fn name(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "connect",
            Self::ClientEvent {
                event: ClientEvent::JoinRoom(_),
                ..
            } => "joinRoom",
            Self::ClientEvent {
                event: ClientEvent::CodeChange(_),
                ..
            } => "codeChange",
            Self::Disconnect { .. } => "disconnect",
            Self::GetRooms { .. } => "getRooms",
            Self::GetRoomDetail { .. } => "getRoomDetail",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    #[error("room hub is not running")]
    Stopped,
}

/// The hub task state
pub struct RoomHub {
    manager: RoomManager,
    rx: mpsc::UnboundedReceiver<HubCommand>,
}

impl RoomHub {
    /// Create a hub and the handle used to talk to it
    pub fn new(manager: RoomManager) -> (Self, RoomHubHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { manager, rx }, RoomHubHandle { tx })
    }

    /// Process commands until every handle is dropped
    pub async fn run(mut self) {
        tracing::info!("Room hub started");
        while let Some(command) = self.rx.recv().await {
            let name = command.name();
            let manager = &mut self.manager;
            if catch_unwind(AssertUnwindSafe(|| process_command(manager, command))).is_err() {
                tracing::error!("Room hub recovered from a panic while handling '{}'", name);
            }
        }
        tracing::info!("Room hub stopped");
    }
}

fn process_command(manager: &mut RoomManager, command: HubCommand) {
    match command {
        HubCommand::Connect {
            connection_id,
            sender,
        } => manager.connect_participant(connection_id, sender),
        HubCommand::ClientEvent {
            connection_id,
            event: ClientEvent::JoinRoom(data),
        } => {
            let room_id = data.room_id.unwrap_or_default();
            let name = data.name.unwrap_or_default();
            if let Err(e) = manager.join_room(connection_id, room_id, name) {
                tracing::warn!("Dropped joinRoom from '{}': {}", connection_id, e);
            }
        }
        HubCommand::ClientEvent {
            connection_id,
            event: ClientEvent::CodeChange(data),
        } => {
            if let Err(e) = manager.change_code(connection_id, data.room_id, data.code) {
                tracing::debug!("Dropped codeChange from '{}': {}", connection_id, e);
            }
        }
        HubCommand::Disconnect { connection_id } => {
            manager.disconnect_participant(connection_id);
        }
        HubCommand::GetRooms { responder } => {
            if responder.send(manager.get_rooms()).is_err() {
                tracing::debug!("Dropped getRooms reply: requester went away");
            }
        }
        HubCommand::GetRoomDetail { room_id, responder } => {
            if responder.send(manager.get_room_detail(room_id)).is_err() {
                tracing::debug!("Dropped getRoomDetail reply: requester went away");
            }
        }
    }
}

/// Cloneable handle for sending commands to the hub
#[derive(Debug, Clone)]
pub struct RoomHubHandle {
    tx: mpsc::UnboundedSender<HubCommand>,
}

impl RoomHubHandle {
    fn send(&self, command: HubCommand) -> Result<(), HubError> {
        self.tx.send(command).map_err(|_| HubError::Stopped)
    }

    pub fn connect(
        &self,
        connection_id: ConnectionId,
        sender: PusherChannel,
    ) -> Result<(), HubError> {
        self.send(HubCommand::Connect {
            connection_id,
            sender,
        })
    }

    pub fn dispatch(&self, connection_id: ConnectionId, event: ClientEvent) -> Result<(), HubError> {
        self.send(HubCommand::ClientEvent {
            connection_id,
            event,
        })
    }

    pub fn disconnect(&self, connection_id: ConnectionId) -> Result<(), HubError> {
        self.send(HubCommand::Disconnect { connection_id })
    }

    pub async fn get_rooms(&self) -> Result<Vec<Room>, HubError> {
        let (responder, rx) = oneshot::channel();
        self.send(HubCommand::GetRooms { responder })?;
        rx.await.map_err(|_| HubError::Stopped)
    }

    pub async fn get_room_detail(
        &self,
        room_id: String,
    ) -> Result<Result<Room, GetRoomDetailError>, HubError> {
        let (responder, rx) = oneshot::channel();
        self.send(HubCommand::GetRoomDetail { room_id, responder })?;
        rx.await.map_err(|_| HubError::Stopped)
    }
}
