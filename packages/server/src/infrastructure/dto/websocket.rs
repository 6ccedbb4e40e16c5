//! WebSocket message DTOs.
//!
//! Every frame is a JSON text frame of the form `{"event": <name>, "data": <payload>}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raw inbound frame before the event name is dispatched
#[derive(Debug, Deserialize)]
pub struct ClientFrame {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// `joinRoom` payload
///
/// Fields are optional at this layer so that a missing field and an empty one are
/// rejected by the same validation in the join use case.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRoomData {
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// `codeChange` payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeChangeData {
    pub room_id: String,
    pub code: String,
}

/// Inbound events understood by the relay
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    JoinRoom(JoinRoomData),
    CodeChange(CodeChangeData),
}

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("unknown event '{0}'")]
    UnknownEvent(String),

    #[error("'{0}' payload is not a JSON object")]
    NotAnObject(String),
}

/// Parse an inbound text frame into a [`ClientEvent`].
pub fn parse_client_event(text: &str) -> Result<ClientEvent, FrameError> {
    let frame: ClientFrame = serde_json::from_str(text)?;
    match frame.event.as_str() {
        "joinRoom" | "join" => Ok(ClientEvent::JoinRoom(object_payload(&frame)?)),
        "codeChange" => Ok(ClientEvent::CodeChange(object_payload(&frame)?)),
        other => Err(FrameError::UnknownEvent(other.to_string())),
    }
}

/// Deserialize `data` only when it is a JSON object.
///
/// Derived structs also accept positional arrays, which are not valid payloads here.
fn object_payload<T: serde::de::DeserializeOwned>(frame: &ClientFrame) -> Result<T, FrameError> {
    if !frame.data.is_object() {
        return Err(FrameError::NotAnObject(frame.event.clone()));
    }
    Ok(T::deserialize(&frame.data)?)
}

/// Roster entry as exposed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantInfo {
    pub id: String,
    pub name: String,
    pub people_id: u8,
}

/// Profile entry keyed by connection id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileInfo {
    pub name: String,
    pub people_id: u8,
}

/// Outbound frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerFrame {
    UpdateRoom(Vec<ParticipantInfo>),
    UpdateProfiles(BTreeMap<String, ProfileInfo>),
    CodeUpdate(String),
}
