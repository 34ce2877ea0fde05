//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

use super::websocket::OutboundMessage;

/// `GET /api/rooms`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomListDto {
    pub rooms: Vec<String>,
}

/// `POST /api/rooms` request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRoomRequestDto {
    pub name: String,
}

/// `POST /api/rooms` response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedRoomDto {
    pub room: String,
}

/// `GET /api/rooms/{room}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDetailDto {
    pub room: String,
    pub subscribers: usize,
    pub messages: usize,
    pub created_at: String,
}

/// `GET /api/rooms/{room}/messages`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomMessagesDto {
    pub messages: Vec<OutboundMessage>,
}

/// Error body: `{"error": ..}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}

impl ErrorDto {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
