//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクト生成時のバリデーションエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// ルーム名が空（空白のみを含む）
    #[error("Room name cannot be empty")]
    EmptyRoomName,

    /// メッセージ本文が空（空白のみを含む）
    #[error("Message content cannot be empty")]
    EmptyMessageContent,
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    /// 指定されたルームが存在しない
    #[error("Room '{0}' not found")]
    RoomNotFound(String),

    /// 同名のルームが既に存在する
    #[error("Room '{0}' already exists")]
    RoomAlreadyExists(String),
}

/// クライアントへのメッセージ送信（キュー投入）のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    /// 送信先の接続が既に閉じている
    #[error("Connection is closed")]
    ConnectionClosed,
}
