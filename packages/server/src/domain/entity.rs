//! エンティティ
//!
//! - `ChatMessage`: 生成後に変更されないチャットメッセージ
//! - `Room`: 購読者集合と上限付きメッセージ履歴を持つチャットルーム

use std::collections::{HashMap, VecDeque};

use super::{
    ConnectionHandle, ConnectionId, MessageContent, MessageId, OutboundEvent, RoomName, Timestamp,
    UserName,
};

/// ルームが保持するメッセージ履歴の上限
pub const HISTORY_CAPACITY: usize = 100;

/// 参加直後に再送する履歴の件数
pub const REPLAY_LIMIT: usize = 50;

/// 履歴取得 API が返す件数
pub const QUERY_LIMIT: usize = 100;

/// チャットメッセージ
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub user: UserName,
    pub content: MessageContent,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// ID を採番してメッセージを作成
    pub fn new(user: UserName, content: MessageContent, timestamp: Timestamp) -> Self {
        Self {
            id: MessageId::generate(),
            user,
            content,
            timestamp,
        }
    }
}

/// ブロードキャストの結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// 送信キューに投入できた購読者数
    pub delivered: usize,
    /// 送信に失敗し、購読者集合から除外された接続
    pub dropped: Vec<ConnectionId>,
    /// 除外の結果ルームが空になり、削除されたか
    pub room_deleted: bool,
}

/// チャットルーム
///
/// ## 不変条件
///
/// - 購読者は `ConnectionId` で一意
/// - 履歴は挿入順で、`history_capacity` を超えた分は古いものから削除される
/// - 履歴への追加と購読者への送信キュー投入は `broadcast` の 1 回の呼び出しで完結する
#[derive(Debug, Clone)]
pub struct Room {
    pub name: RoomName,
    pub created_at: Timestamp,
    subscribers: HashMap<ConnectionId, ConnectionHandle>,
    history: VecDeque<ChatMessage>,
    history_capacity: usize,
    /// 一度でも購読者が参加したか
    occupied: bool,
}

impl Room {
    pub fn new(name: RoomName, created_at: Timestamp) -> Self {
        Self::with_capacity(name, created_at, HISTORY_CAPACITY)
    }

    /// 履歴の上限を指定して作成
    pub fn with_capacity(name: RoomName, created_at: Timestamp, history_capacity: usize) -> Self {
        Self {
            name,
            created_at,
            subscribers: HashMap::new(),
            history: VecDeque::with_capacity(history_capacity),
            history_capacity,
            occupied: false,
        }
    }

    /// 購読者を追加する（同じ接続の再追加は何もしない）
    ///
    /// 新たに追加された場合は `true`
    pub fn join(&mut self, handle: ConnectionHandle) -> bool {
        if self.subscribers.contains_key(&handle.id()) {
            return false;
        }
        self.subscribers.insert(handle.id(), handle);
        self.occupied = true;
        true
    }

    /// 購読者を削除する
    ///
    /// 実際に削除された場合は `true`
    pub fn leave(&mut self, connection_id: &ConnectionId) -> bool {
        self.subscribers.remove(connection_id).is_some()
    }

    /// 直近 `limit` 件の履歴を古い順に `handle` だけへ送る
    ///
    /// 送信できた件数を返す。
    pub fn replay_history(
        &self,
        handle: &ConnectionHandle,
        limit: usize,
    ) -> Result<usize, super::MessagePushError> {
        let recent = self.recent_messages(limit);
        let count = recent.len();
        for message in recent {
            handle.push(OutboundEvent::Message(message))?;
        }
        Ok(count)
    }

    /// 履歴に追加してから全購読者に送る
    ///
    /// 送信に失敗した購読者は退出扱いとして購読者集合から除外する。
    /// 一部の失敗はブロードキャスト全体を失敗させない。
    pub fn broadcast(&mut self, message: ChatMessage) -> BroadcastReport {
        self.history.push_back(message.clone());
        while self.history.len() > self.history_capacity {
            self.history.pop_front();
        }

        let mut report = BroadcastReport::default();
        for (connection_id, handle) in &self.subscribers {
            match handle.push(OutboundEvent::Message(message.clone())) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    tracing::warn!(
                        "Failed to deliver message to connection '{}' in room '{}': {}",
                        connection_id,
                        self.name,
                        e
                    );
                    report.dropped.push(*connection_id);
                }
            }
        }

        for connection_id in &report.dropped {
            self.subscribers.remove(connection_id);
        }

        report
    }

    /// 直近 `limit` 件の履歴（古い順）
    pub fn recent_messages(&self, limit: usize) -> Vec<ChatMessage> {
        let skip = self.history.len().saturating_sub(limit);
        self.history.iter().skip(skip).cloned().collect()
    }

    pub fn is_subscribed(&self, connection_id: &ConnectionId) -> bool {
        self.subscribers.contains_key(connection_id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// 購読者がいない（削除対象である）
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn message_count(&self) -> usize {
        self.history.len()
    }

    /// 参加者がいたのに全員いなくなった
    ///
    /// 作成直後でまだ誰も参加していないルームは該当しない。
    pub fn is_abandoned(&self) -> bool {
        self.occupied && self.subscribers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::Utc;
    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        domain::{MessagePushError, MockMessagePusher},
        infrastructure::message_pusher::WebSocketMessagePusher,
    };

    fn create_test_room() -> Room {
        Room::new(RoomName::new("general").unwrap(), Timestamp::new(Utc::now()))
    }

    fn create_test_message(content: &str) -> ChatMessage {
        ChatMessage::new(
            UserName::new(Some("alice")),
            MessageContent::new(content).unwrap(),
            Timestamp::new(Utc::now()),
        )
    }

    fn create_test_handle() -> (ConnectionHandle, mpsc::UnboundedReceiver<OutboundEvent>) {
        let (pusher, rx) = WebSocketMessagePusher::channel();
        (ConnectionHandle::new(Arc::new(pusher)), rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<OutboundEvent>) -> Vec<String> {
        let mut contents = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let OutboundEvent::Message(message) = event {
                contents.push(message.content.into_string());
            }
        }
        contents
    }

    #[test]
    fn test_join_is_idempotent() {
        // テスト項目: 同じ接続を 2 回 join しても購読者は 1 人
        // given (前提条件):
        let mut room = create_test_room();
        let (handle, _rx) = create_test_handle();

        // when (操作):
        let first = room.join(handle.clone());
        let second = room.join(handle.clone());

        // then (期待する結果):
        assert!(first);
        assert!(!second);
        assert_eq!(room.subscriber_count(), 1);
        assert!(room.is_subscribed(&handle.id()));
    }

    #[test]
    fn test_leave_removes_subscriber() {
        // テスト項目: leave で購読者が削除され、ルームが空になる
        // given (前提条件):
        let mut room = create_test_room();
        let (handle, _rx) = create_test_handle();
        room.join(handle.clone());

        // when (操作):
        let removed = room.leave(&handle.id());
        let removed_again = room.leave(&handle.id());

        // then (期待する結果):
        assert!(removed);
        assert!(!removed_again);
        assert!(room.is_empty());
    }

    #[test]
    fn test_broadcast_appends_and_delivers_to_all_subscribers() {
        // テスト項目: ブロードキャストが履歴に追加され、全購読者に届く
        // given (前提条件):
        let mut room = create_test_room();
        let (alice, mut alice_rx) = create_test_handle();
        let (bob, mut bob_rx) = create_test_handle();
        room.join(alice);
        room.join(bob);

        // when (操作):
        let report = room.broadcast(create_test_message("hi"));

        // then (期待する結果):
        assert_eq!(report.delivered, 2);
        assert!(report.dropped.is_empty());
        assert_eq!(room.message_count(), 1);
        assert_eq!(drain(&mut alice_rx), vec!["hi"]);
        assert_eq!(drain(&mut bob_rx), vec!["hi"]);
    }

    #[test]
    fn test_broadcast_preserves_order_for_every_subscriber() {
        // テスト項目: 各購読者が履歴と同じ順序でメッセージを受信する
        // given (前提条件):
        let mut room = create_test_room();
        let (alice, mut alice_rx) = create_test_handle();
        let (bob, mut bob_rx) = create_test_handle();
        room.join(alice);
        room.join(bob);

        // when (操作):
        for content in ["one", "two", "three"] {
            room.broadcast(create_test_message(content));
        }

        // then (期待する結果):
        let history: Vec<String> = room
            .recent_messages(REPLAY_LIMIT)
            .into_iter()
            .map(|m| m.content.into_string())
            .collect();
        assert_eq!(history, vec!["one", "two", "three"]);
        assert_eq!(drain(&mut alice_rx), history);
        assert_eq!(drain(&mut bob_rx), history);
    }

    #[test]
    fn test_broadcast_drops_failed_subscriber_and_continues() {
        // テスト項目: 一部の購読者への送信失敗は他の購読者への配信を妨げず、失敗した購読者は除外される
        // given (前提条件):
        let mut room = create_test_room();
        let (alice, mut alice_rx) = create_test_handle();
        let mut broken = MockMessagePusher::new();
        broken
            .expect_push()
            .times(1)
            .returning(|_| Err(MessagePushError::ConnectionClosed));
        let broken = ConnectionHandle::new(Arc::new(broken));
        room.join(alice);
        room.join(broken.clone());

        // when (操作):
        let report = room.broadcast(create_test_message("hello"));

        // then (期待する結果):
        assert_eq!(report.delivered, 1);
        assert_eq!(report.dropped, vec![broken.id()]);
        assert!(!room.is_subscribed(&broken.id()));
        assert_eq!(room.subscriber_count(), 1);
        assert_eq!(drain(&mut alice_rx), vec!["hello"]);
    }

    #[test]
    fn test_history_is_trimmed_fifo() {
        // テスト項目: 履歴が上限を超えると古いものから削除される
        // given (前提条件):
        let mut room = Room::with_capacity(
            RoomName::new("small").unwrap(),
            Timestamp::new(Utc::now()),
            3,
        );

        // when (操作):
        for i in 0..5 {
            room.broadcast(create_test_message(&format!("m{}", i)));
        }

        // then (期待する結果):
        let history: Vec<String> = room
            .recent_messages(10)
            .into_iter()
            .map(|m| m.content.into_string())
            .collect();
        assert_eq!(history, vec!["m2", "m3", "m4"]);
    }

    #[test]
    fn test_replay_history_sends_last_messages_in_order_to_handle_only() {
        // テスト項目: 履歴の再送は直近 limit 件を古い順に、対象の接続だけに送る
        // given (前提条件):
        let mut room = create_test_room();
        let (existing, mut existing_rx) = create_test_handle();
        room.join(existing);
        for i in 0..(REPLAY_LIMIT + 10) {
            room.broadcast(create_test_message(&format!("m{}", i)));
        }
        drain(&mut existing_rx);
        let (newcomer, mut newcomer_rx) = create_test_handle();

        // when (操作):
        let replayed = room.replay_history(&newcomer, REPLAY_LIMIT).unwrap();

        // then (期待する結果):
        assert_eq!(replayed, REPLAY_LIMIT);
        let received = drain(&mut newcomer_rx);
        assert_eq!(received.len(), REPLAY_LIMIT);
        assert_eq!(received.first().map(String::as_str), Some("m10"));
        assert_eq!(received.last().map(String::as_str), Some("m59"));
        assert!(drain(&mut existing_rx).is_empty());
    }

    #[test]
    fn test_replay_history_on_empty_room_sends_nothing() {
        // テスト項目: 履歴が空なら何も送らない
        // given (前提条件):
        let room = create_test_room();
        let (handle, mut rx) = create_test_handle();

        // when (操作):
        let replayed = room.replay_history(&handle, REPLAY_LIMIT).unwrap();

        // then (期待する結果):
        assert_eq!(replayed, 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_room_is_abandoned_only_after_being_occupied() {
        // テスト項目: 誰も参加していないルームは放棄扱いにならず、全員が退出すると放棄扱いになる
        // given (前提条件):
        let mut room = create_test_room();
        let (handle, _rx) = create_test_handle();
        let fresh = room.is_abandoned();

        // when (操作):
        room.join(handle.clone());
        let occupied = room.is_abandoned();
        room.leave(&handle.id());

        // then (期待する結果):
        assert!(!fresh);
        assert!(!occupied);
        assert!(room.is_abandoned());
    }
}
