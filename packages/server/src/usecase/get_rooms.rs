//! UseCase: ルーム一覧取得処理

use std::sync::Arc;

use crate::domain::{RoomName, RoomRepository};

/// ルーム一覧取得のユースケース
pub struct GetRoomsUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    /// 新しい GetRoomsUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 存在するルーム名の一覧（昇順）を取得
    pub async fn execute(&self) -> Vec<RoomName> {
        self.repository.list_rooms().await
    }
}
