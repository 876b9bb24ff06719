//! Conversion logic between DTOs and domain entities.

use tsudoi_shared::time::timestamp_to_rfc3339;

use crate::domain::{ChatMessage, MessageDraft, Presence, Room};
use crate::infrastructure::dto::{http, websocket};

// ========================================
// DTO → Domain
// ========================================

impl From<websocket::InboundMessage> for MessageDraft {
    fn from(dto: websocket::InboundMessage) -> Self {
        Self {
            sender: dto.user_id,
            room_id: dto.room_id,
            content: dto.content,
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<ChatMessage> for websocket::OutboundMessage {
    fn from(model: ChatMessage) -> Self {
        Self {
            id: model.id.to_string(),
            user_id: model.user_id.into_string(),
            room_id: model.room_id.into_string(),
            content: model.content.into_string(),
            timestamp: model.timestamp.value(),
        }
    }
}

impl From<Presence> for http::PresenceDto {
    fn from(model: Presence) -> Self {
        Self {
            user_id: model.user_id.into_string(),
            online: model.online,
            last_seen: model.last_seen.value(),
            last_seen_at: timestamp_to_rfc3339(model.last_seen.value()),
        }
    }
}

impl From<Room> for http::RoomDto {
    fn from(model: Room) -> Self {
        Self {
            id: model.id.into_string(),
            name: model.name,
            members: model.members.into_iter().map(|m| m.into_string()).collect(),
        }
    }
}
