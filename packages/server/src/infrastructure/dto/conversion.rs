//! Conversion logic from domain entities to DTOs.

use xor_relay_shared::time::timestamp_to_jst_rfc3339;

use crate::domain::{Participant, Profile, Room, ServerEvent};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Entity → WebSocket DTO
// ========================================

impl From<&Participant> for dto::ParticipantInfo {
    fn from(model: &Participant) -> Self {
        Self {
            id: model.connection_id.to_string(),
            name: model.display_name.as_str().to_string(),
            people_id: model.slot.value(),
        }
    }
}

impl From<&Profile> for dto::ProfileInfo {
    fn from(model: &Profile) -> Self {
        Self {
            name: model.display_name.as_str().to_string(),
            people_id: model.slot.value(),
        }
    }
}

impl From<&ServerEvent> for dto::ServerFrame {
    fn from(event: &ServerEvent) -> Self {
        match event {
            ServerEvent::UpdateRoom(participants) => {
                Self::UpdateRoom(participants.iter().map(Into::into).collect())
            }
            ServerEvent::UpdateProfiles(profiles) => Self::UpdateProfiles(
                profiles
                    .iter()
                    .map(|(id, profile)| (id.to_string(), profile.into()))
                    .collect(),
            ),
            ServerEvent::CodeUpdate(code) => Self::CodeUpdate(code.clone()),
        }
    }
}

/// Encode a domain event as a JSON text frame.
pub fn encode_server_event(event: &ServerEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&dto::ServerFrame::from(event))
}

// ========================================
// Domain Entity → HTTP DTO
// ========================================

impl From<&Room> for http::RoomSummaryDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id().as_str().to_string(),
            participants: room
                .participants()
                .iter()
                .map(|p| p.display_name.as_str().to_string())
                .collect(),
            created_at: timestamp_to_jst_rfc3339(room.created_at().value()),
        }
    }
}

impl From<&Room> for http::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            id: room.id().as_str().to_string(),
            participants: room
                .participants()
                .iter()
                .map(|p| http::ParticipantDetailDto {
                    id: p.connection_id.to_string(),
                    name: p.display_name.as_str().to_string(),
                    people_id: p.slot.value(),
                })
                .collect(),
            code_length: room.code().len(),
            created_at: timestamp_to_jst_rfc3339(room.created_at().value()),
        }
    }
}
