//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};

/// Inbound chat frame sent by a client.
///
/// Missing fields decode as empty strings so that they are rejected by
/// validation instead of being reported as malformed frames. Server-owned
/// fields (`id`, `timestamp`) are ignored if a client sends them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    #[serde(default, alias = "UserID")]
    pub user_id: String,
    #[serde(default, alias = "RoomID")]
    pub room_id: String,
    #[serde(default, alias = "Content")]
    pub content: String,
}

/// Outbound chat message delivered to room subscribers and returned by the
/// history API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub id: String,
    pub user_id: String,
    pub room_id: String,
    pub content: String,
    pub timestamp: i64,
}

/// Decode one text payload into an inbound message.
pub fn decode_inbound(text: &str) -> Result<InboundMessage, serde_json::Error> {
    serde_json::from_str(text)
}
