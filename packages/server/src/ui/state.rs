//! Shared application state.

use std::{sync::Arc, time::Duration};

use crate::{
    domain::{RoomCreationPolicy, RoomRepository},
    usecase::{
        ConnectParticipantUseCase, CreateRoomUseCase, DisconnectParticipantUseCase,
        GetRoomDetailUseCase, GetRoomMessagesUseCase, GetRoomsUseCase, SendMessageUseCase,
    },
};

/// Default upper bound for a single WebSocket write
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared application state
pub struct AppState {
    /// ConnectParticipantUseCase（参加者接続のユースケース）
    pub connect_participant_usecase: Arc<ConnectParticipantUseCase>,
    /// DisconnectParticipantUseCase（参加者切断のユースケース）
    pub disconnect_participant_usecase: Arc<DisconnectParticipantUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// CreateRoomUseCase（ルーム作成のユースケース）
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    /// GetRoomsUseCase（ルーム一覧取得のユースケース）
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    /// GetRoomDetailUseCase（ルーム詳細取得のユースケース）
    pub get_room_detail_usecase: Arc<GetRoomDetailUseCase>,
    /// GetRoomMessagesUseCase（メッセージ履歴取得のユースケース）
    pub get_room_messages_usecase: Arc<GetRoomMessagesUseCase>,
    /// Upper bound for a single WebSocket write; a slower client is disconnected
    pub send_timeout: Duration,
}

impl AppState {
    /// Build every use case on top of the given repository and room-creation policy.
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        policy: Arc<dyn RoomCreationPolicy>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            connect_participant_usecase: Arc::new(ConnectParticipantUseCase::new(
                repository.clone(),
            )),
            disconnect_participant_usecase: Arc::new(DisconnectParticipantUseCase::new(
                repository.clone(),
            )),
            send_message_usecase: Arc::new(SendMessageUseCase::new(repository.clone())),
            create_room_usecase: Arc::new(CreateRoomUseCase::new(repository.clone(), policy)),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(repository.clone())),
            get_room_detail_usecase: Arc::new(GetRoomDetailUseCase::new(repository.clone())),
            get_room_messages_usecase: Arc::new(GetRoomMessagesUseCase::new(repository)),
            send_timeout,
        }
    }
}
