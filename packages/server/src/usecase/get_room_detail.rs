//! UseCase: ルーム詳細取得処理

use std::sync::Arc;

use crate::domain::{Room, RoomName, RoomRepository};

use super::error::GetRoomDetailError;

/// ルーム詳細取得のユースケース
pub struct GetRoomDetailUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomDetailUseCase {
    /// 新しい GetRoomDetailUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// ルームのスナップショットを取得
    pub async fn execute(&self, raw_name: &str) -> Result<Room, GetRoomDetailError> {
        let name = RoomName::new(raw_name).map_err(|_| GetRoomDetailError::RoomNotFound)?;
        self.repository
            .get_room(&name)
            .await
            .map_err(|_| GetRoomDetailError::RoomNotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::repository::InMemoryRoomRepository;

    #[tokio::test]
    async fn test_get_room_detail() {
        // テスト項目: 既存ルームの詳細を取得でき、存在しないルームはエラーになる
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::with_default_room(
            RoomName::new("general").unwrap(),
        ));
        let usecase = GetRoomDetailUseCase::new(repository);

        // when (操作):
        let found = usecase.execute("GENERAL").await;
        let missing = usecase.execute("nosuchroom").await;

        // then (期待する結果):
        let room = found.unwrap();
        assert_eq!(room.name.as_str(), "general");
        assert_eq!(room.subscriber_count(), 0);
        assert!(matches!(missing, Err(GetRoomDetailError::RoomNotFound)));
    }
}
