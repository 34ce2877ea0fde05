//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - メッセージの生成（ID・時刻・ユーザー名の既定値）と、ルームへのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 空のメッセージが履歴にも配信にも現れないことを保証
//! - 送信者自身を含む全購読者に配信されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - エッジケース：空白のみのメッセージ（無視される）
//! - 異常系：ルームが既に存在しない

use std::sync::Arc;

use hiroba_shared::time::{Clock, SystemClock};

use crate::domain::{
    BroadcastReport, ChatMessage, MessageContent, RoomName, RoomRepository, Timestamp, UserName,
};

use super::error::SendMessageError;

/// メッセージ送信の結果
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// ブロードキャストした
    Broadcast {
        message: ChatMessage,
        report: BroadcastReport,
    },
    /// 本文が空のため何もしなかった
    Ignored,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// メッセージのタイムスタンプの取得元
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self::with_clock(repository, Arc::new(SystemClock))
    }

    pub fn with_clock(repository: Arc<dyn RoomRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `room` - 送信先のルーム
    /// * `user` - 送信者の表示名（未指定なら `"Anonymous"`）
    /// * `content` - メッセージ本文（空白除去前）
    ///
    /// # Returns
    ///
    /// * `Ok(SendOutcome::Broadcast)` - 履歴に追加し、全購読者に送信した
    /// * `Ok(SendOutcome::Ignored)` - 本文が空のため無視した
    /// * `Err(SendMessageError)` - ルームが存在しない
    pub async fn execute(
        &self,
        room: &RoomName,
        user: Option<&str>,
        content: &str,
    ) -> Result<SendOutcome, SendMessageError> {
        // 1. 本文の検証（空なら黙って無視）
        let Ok(content) = MessageContent::new(content) else {
            tracing::debug!("Ignoring empty message in room '{}'", room);
            return Ok(SendOutcome::Ignored);
        };

        // 2. メッセージの生成
        let message = ChatMessage::new(
            UserName::new(user),
            content,
            Timestamp::new(self.clock.now()),
        );

        // 3. 履歴への追加と全購読者への送信
        let report = self
            .repository
            .broadcast(room, message.clone())
            .await
            .map_err(|_| SendMessageError::RoomNotFound)?;

        tracing::debug!(
            "Broadcasted message '{}' from '{}' to {} subscriber(s) in room '{}'",
            message.id,
            message.user.as_str(),
            report.delivered,
            room
        );

        Ok(SendOutcome::Broadcast { message, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ConnectionHandle, OutboundEvent},
        infrastructure::{
            message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository,
        },
    };
    use hiroba_shared::time::FixedClock;
    use tokio::sync::mpsc;

    fn general() -> RoomName {
        RoomName::new("general").unwrap()
    }

    async fn setup() -> (
        Arc<InMemoryRoomRepository>,
        SendMessageUseCase,
        Vec<mpsc::UnboundedReceiver<OutboundEvent>>,
    ) {
        let repository = Arc::new(InMemoryRoomRepository::with_default_room(general()));
        let usecase = SendMessageUseCase::with_clock(
            repository.clone(),
            Arc::new(FixedClock::from_millis(1_672_531_200_000)),
        );
        let mut receivers = Vec::new();
        for _ in 0..2 {
            let (pusher, rx) = WebSocketMessagePusher::channel();
            repository
                .join(&general(), ConnectionHandle::new(Arc::new(pusher)), 0)
                .await
                .unwrap();
            receivers.push(rx);
        }
        (repository, usecase, receivers)
    }

    #[tokio::test]
    async fn test_send_message_success() {
        // テスト項目: メッセージが履歴に追加され、全購読者に配信される
        // given (前提条件):
        let (repository, usecase, mut receivers) = setup().await;

        // when (操作):
        let result = usecase.execute(&general(), None, "  hi  ").await;

        // then (期待する結果):
        let Ok(SendOutcome::Broadcast { message, report }) = result else {
            panic!("expected broadcast");
        };
        assert_eq!(message.content.as_str(), "hi");
        assert_eq!(message.user.as_str(), "Anonymous");
        assert_eq!(
            message.timestamp.value().timestamp_millis(),
            1_672_531_200_000
        );
        assert_eq!(report.delivered, 2);

        let history = repository.get_messages(&general(), 100).await.unwrap();
        assert_eq!(history, vec![message.clone()]);
        for rx in receivers.iter_mut() {
            assert_eq!(rx.recv().await, Some(OutboundEvent::Message(message.clone())));
        }
    }

    #[tokio::test]
    async fn test_send_message_keeps_user_name() {
        // テスト項目: 指定されたユーザー名がメッセージに設定される
        // given (前提条件):
        let (_repository, usecase, _receivers) = setup().await;

        // when (操作):
        let result = usecase
            .execute(&general(), Some("alice"), "hello")
            .await
            .unwrap();

        // then (期待する結果):
        let SendOutcome::Broadcast { message, .. } = result else {
            panic!("expected broadcast");
        };
        assert_eq!(message.user.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_send_whitespace_message_is_ignored() {
        // テスト項目: 空白のみのメッセージは履歴にも配信にも現れない
        // given (前提条件):
        let (repository, usecase, mut receivers) = setup().await;

        // when (操作):
        let result = usecase.execute(&general(), Some("alice"), " \n\t ").await;

        // then (期待する結果):
        assert_eq!(result, Ok(SendOutcome::Ignored));
        assert!(
            repository
                .get_messages(&general(), 100)
                .await
                .unwrap()
                .is_empty()
        );
        for rx in receivers.iter_mut() {
            assert!(rx.try_recv().is_err());
        }
    }

    #[tokio::test]
    async fn test_send_message_room_not_found() {
        // テスト項目: 存在しないルームへの送信はエラーになる
        // given (前提条件):
        let (_repository, usecase, _receivers) = setup().await;

        // when (操作):
        let result = usecase
            .execute(&RoomName::new("gone").unwrap(), None, "hi")
            .await;

        // then (期待する結果):
        assert_eq!(result, Err(SendMessageError::RoomNotFound));
    }
}
