//! UseCase 層のエラー型

use thiserror::Error;

/// 参加者接続のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("Room not found")]
    RoomNotFound,
}

/// メッセージ送信のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    #[error("Room not found")]
    RoomNotFound,
}

/// ルーム作成のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error("Invalid room name")]
    InvalidName,

    #[error("Room already exists")]
    AlreadyExists,

    #[error("Unauthorized")]
    Unauthorized,
}

/// ルーム詳細取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomDetailError {
    #[error("Room not found")]
    RoomNotFound,
}

/// メッセージ履歴取得のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetRoomMessagesError {
    #[error("Room not found")]
    RoomNotFound,
}
