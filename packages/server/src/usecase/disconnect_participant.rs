//! UseCase: 参加者切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectParticipantUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 切断時に購読者が必ず取り除かれ、漏れが残らないことを保証
//! - 最後の参加者が切断した場合にルームが削除されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の切断
//! - エッジケース：最後の参加者の切断、参加していない接続の切断

use std::sync::Arc;

use crate::domain::{ConnectionId, LeaveOutcome, RoomName, RoomRepository};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl DisconnectParticipantUseCase {
    /// 新しい DisconnectParticipantUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 参加者切断を実行
    ///
    /// 参加していない接続に対しては何もしない（冪等）。
    pub async fn execute(&self, room: &RoomName, connection_id: &ConnectionId) -> LeaveOutcome {
        let outcome = self.repository.leave(room, connection_id).await;
        if outcome.room_deleted {
            tracing::info!("Room '{}' deleted after last subscriber left", room);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::ConnectionHandle,
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
        },
    };

    fn create_test_handle() -> ConnectionHandle {
        let (pusher, _rx) = WebSocketMessagePusher::channel();
        ConnectionHandle::new(Arc::new(pusher))
    }

    #[tokio::test]
    async fn test_disconnect_participant_success() {
        // テスト項目: 参加者が切断するとルームから削除される
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let dev = RoomName::new("dev").unwrap();
        repository.create_room(dev.clone()).await.unwrap();
        let alice = create_test_handle();
        let bob = create_test_handle();
        repository.join(&dev, alice.clone(), 0).await.unwrap();
        repository.join(&dev, bob.clone(), 0).await.unwrap();
        let usecase = DisconnectParticipantUseCase::new(repository.clone());

        // when (操作):
        let outcome = usecase.execute(&dev, &alice.id()).await;

        // then (期待する結果):
        assert!(outcome.removed);
        assert!(!outcome.room_deleted);
        assert_eq!(repository.subscriber_count(&dev).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_last_participant_deletes_room() {
        // テスト項目: 最後の参加者が切断するとルームが削除される
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let dev = RoomName::new("dev").unwrap();
        repository.create_room(dev.clone()).await.unwrap();
        let alice = create_test_handle();
        repository.join(&dev, alice.clone(), 0).await.unwrap();
        let usecase = DisconnectParticipantUseCase::new(repository.clone());

        // when (操作):
        let outcome = usecase.execute(&dev, &alice.id()).await;

        // then (期待する結果):
        assert!(outcome.room_deleted);
        assert!(repository.list_rooms().await.is_empty());
    }

    #[tokio::test]
    async fn test_disconnect_never_joined_is_noop() {
        // テスト項目: 参加していない接続の切断は何もしない
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let usecase = DisconnectParticipantUseCase::new(repository.clone());
        let ghost = create_test_handle();

        // when (操作):
        let outcome = usecase
            .execute(&RoomName::new("nosuchroom").unwrap(), &ghost.id())
            .await;

        // then (期待する結果):
        assert_eq!(outcome, LeaveOutcome::default());
    }
}
