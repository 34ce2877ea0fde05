//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};

/// Payload sent by a client: `{"content": string, "user"?: string}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InboundMessage {
    pub content: String,
    #[serde(default)]
    pub user: Option<String>,
}

/// Payload sent to a client, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
    /// `{"type":"message","content":..,"user":..,"timestamp":..,"id":..}`
    Message {
        content: String,
        user: String,
        timestamp: String,
        id: String,
    },
    /// `{"type":"error","message":..}`
    Error { message: String },
}
