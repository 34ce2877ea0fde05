//! 接続ハンドルとメッセージ送信の抽象化
//!
//! ## 設計ノート
//!
//! ドメイン層は「接続に対してイベントを送る」ことだけを知っています。
//! 実際のトランスポート（WebSocket の書き込み）は Infrastructure 層の
//! `MessagePusher` 実装と UI 層の送信タスクが担当します。
//!
//! `push` は同期・非ブロッキングです。ルームのロックを保持したまま呼び出され、
//! 送信キューへの投入だけを行います。

use std::{fmt, sync::Arc};

use super::{ChatMessage, ConnectionId, MessagePushError};

/// クライアントへ送るイベント
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundEvent {
    /// チャットメッセージ（ブロードキャスト・履歴の再送）
    Message(ChatMessage),
    /// 送信元クライアントだけに送るエラー通知
    Error(String),
}

/// クライアントへのメッセージ送信 trait
#[cfg_attr(test, mockall::automock)]
pub trait MessagePusher: Send + Sync {
    /// イベントを送信キューに投入する
    ///
    /// # Errors
    ///
    /// 接続が既に閉じている場合は `MessagePushError::ConnectionClosed`
    fn push(&self, event: OutboundEvent) -> Result<(), MessagePushError>;
}

/// 1 クライアントの接続を表すハンドル
///
/// 参加中はちょうど 1 つのルームの購読者集合に所有されます。
#[derive(Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    pusher: Arc<dyn MessagePusher>,
}

impl ConnectionHandle {
    /// 新しい接続 ID を採番してハンドルを作成
    pub fn new(pusher: Arc<dyn MessagePusher>) -> Self {
        Self {
            id: ConnectionId::generate(),
            pusher,
        }
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    pub fn push(&self, event: OutboundEvent) -> Result<(), MessagePushError> {
        self.pusher.push(event)
    }
}

impl fmt::Debug for ConnectionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionHandle")
            .field("id", &self.id)
            .finish_non_exhaustive()
    }
}
