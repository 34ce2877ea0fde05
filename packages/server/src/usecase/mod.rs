//! UseCase 層
//!
//! 1 つの操作につき 1 つのユースケース構造体を定義します。
//! 各ユースケースは `Arc<dyn RoomRepository>` にのみ依存します。

mod connect_participant;
mod create_room;
mod disconnect_participant;
mod error;
mod get_room_detail;
mod get_room_messages;
mod get_rooms;
mod send_message;

pub use connect_participant::{ConnectParticipantUseCase, JoinedRoom};
pub use create_room::CreateRoomUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{
    ConnectError, CreateRoomError, GetRoomDetailError, GetRoomMessagesError, SendMessageError,
};
pub use get_room_detail::GetRoomDetailUseCase;
pub use get_room_messages::GetRoomMessagesUseCase;
pub use get_rooms::GetRoomsUseCase;
pub use send_message::{SendMessageUseCase, SendOutcome};
