//! ドメイン層
//!
//! チャットルーム、メッセージ、接続ハンドルといったビジネスの中心概念と、
//! 外部（ストレージ・通信）へのインターフェース（trait）を定義します。

pub mod connection;
pub mod entity;
pub mod error;
pub mod policy;
pub mod repository;
pub mod value_object;

pub use connection::{ConnectionHandle, MessagePusher, OutboundEvent};
pub use entity::{BroadcastReport, ChatMessage, HISTORY_CAPACITY, QUERY_LIMIT, REPLAY_LIMIT, Room};
pub use error::{MessagePushError, RepositoryError, ValidationError};
pub use policy::{AllowAll, RequireUser, RoomCreationPolicy};
pub use repository::{LeaveOutcome, RoomRepository};
pub use value_object::{ConnectionId, MessageContent, MessageId, RoomName, Timestamp, UserName};

#[cfg(test)]
pub use connection::MockMessagePusher;
