//! UseCase: メッセージ履歴取得処理

use std::sync::Arc;

use crate::domain::{ChatMessage, QUERY_LIMIT, RoomName, RoomRepository};

use super::error::GetRoomMessagesError;

/// メッセージ履歴取得のユースケース
pub struct GetRoomMessagesUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomMessagesUseCase {
    /// 新しい GetRoomMessagesUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 直近 100 件のメッセージを古い順に取得
    pub async fn execute(&self, raw_name: &str) -> Result<Vec<ChatMessage>, GetRoomMessagesError> {
        let name = RoomName::new(raw_name).map_err(|_| GetRoomMessagesError::RoomNotFound)?;
        self.repository
            .get_messages(&name, QUERY_LIMIT)
            .await
            .map_err(|_| GetRoomMessagesError::RoomNotFound)
    }
}
