//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの `UnboundedSender` を保持
//! - イベントを送信キューに投入する（実際の書き込みはしない）
//!
//! ## 設計ノート
//!
//! WebSocket への書き込みは UI 層（`ui/handler/websocket.rs`）の送信タスクが
//! キューの受信側から取り出して行います。
//!
//! - ルームのロック内: キューへの投入だけ（ブロックしない）
//! - ロックの外: 送信タスクによるネットワーク書き込み（タイムアウト付き）

use tokio::sync::mpsc;

use crate::domain::{MessagePushError, MessagePusher, OutboundEvent};

/// 送信キューの送信側
pub type PusherChannel = mpsc::UnboundedSender<OutboundEvent>;

/// WebSocket を使った MessagePusher 実装
///
/// ## 使用例
///
/// ```ignore
/// let (pusher, rx) = WebSocketMessagePusher::channel();
/// let handle = ConnectionHandle::new(Arc::new(pusher));
///
/// // rx は送信タスクに渡す
/// ```
pub struct WebSocketMessagePusher {
    sender: PusherChannel,
}

impl WebSocketMessagePusher {
    pub fn new(sender: PusherChannel) -> Self {
        Self { sender }
    }

    /// 送信キューを作成し、pusher と受信側を返す
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutboundEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl MessagePusher for WebSocketMessagePusher {
    fn push(&self, event: OutboundEvent) -> Result<(), MessagePushError> {
        self.sender
            .send(event)
            .map_err(|_| MessagePushError::ConnectionClosed)
    }
}
