//! Conversion logic between DTOs and domain entities.

use crate::domain::{ChatMessage, OutboundEvent, Room, RoomName};
use crate::infrastructure::dto::{http, websocket as dto};

// ========================================
// Domain Entity → DTO
// ========================================

impl From<&ChatMessage> for dto::OutboundMessage {
    fn from(model: &ChatMessage) -> Self {
        Self::Message {
            content: model.content.as_str().to_string(),
            user: model.user.as_str().to_string(),
            timestamp: model.timestamp.to_rfc3339(),
            id: model.id.to_string(),
        }
    }
}

impl From<OutboundEvent> for dto::OutboundMessage {
    fn from(event: OutboundEvent) -> Self {
        match event {
            OutboundEvent::Message(message) => Self::from(&message),
            OutboundEvent::Error(message) => Self::Error { message },
        }
    }
}

impl From<Vec<RoomName>> for http::RoomListDto {
    fn from(names: Vec<RoomName>) -> Self {
        Self {
            rooms: names.into_iter().map(RoomName::into_string).collect(),
        }
    }
}

impl From<&Room> for http::RoomDetailDto {
    fn from(room: &Room) -> Self {
        Self {
            room: room.name.as_str().to_string(),
            subscribers: room.subscriber_count(),
            messages: room.message_count(),
            created_at: room.created_at.to_rfc3339(),
        }
    }
}

impl From<Vec<ChatMessage>> for http::RoomMessagesDto {
    fn from(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages: messages.iter().map(dto::OutboundMessage::from).collect(),
        }
    }
}
