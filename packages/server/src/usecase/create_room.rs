//! UseCase: ルーム作成処理

use std::sync::Arc;

use crate::domain::{RepositoryError, RoomCreationPolicy, RoomName, RoomRepository};

use super::error::CreateRoomError;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// ルーム作成の認可判定
    policy: Arc<dyn RoomCreationPolicy>,
}

impl CreateRoomUseCase {
    /// 新しい CreateRoomUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>, policy: Arc<dyn RoomCreationPolicy>) -> Self {
        Self { repository, policy }
    }

    /// ルーム作成を実行
    ///
    /// # Arguments
    ///
    /// * `raw_name` - 作成するルーム名（正規化前）
    /// * `requester` - リクエストしたユーザー名（あれば）
    ///
    /// # Returns
    ///
    /// * `Ok(RoomName)` - 作成したルーム名（正規化済み）
    /// * `Err(CreateRoomError)` - 認可されない、名前が不正、または既に存在する
    pub async fn execute(
        &self,
        raw_name: &str,
        requester: Option<&str>,
    ) -> Result<RoomName, CreateRoomError> {
        // 1. 認可
        if !self.policy.can_create_room(requester) {
            tracing::warn!("Room creation declined for requester {:?}", requester);
            return Err(CreateRoomError::Unauthorized);
        }

        // 2. ルーム名の正規化
        let name = RoomName::new(raw_name).map_err(|_| CreateRoomError::InvalidName)?;

        // 3. 作成
        self.repository
            .create_room(name.clone())
            .await
            .map_err(|e| match e {
                RepositoryError::RoomAlreadyExists(_) => CreateRoomError::AlreadyExists,
                RepositoryError::RoomNotFound(_) => CreateRoomError::InvalidName,
            })?;

        Ok(name)
    }
}
