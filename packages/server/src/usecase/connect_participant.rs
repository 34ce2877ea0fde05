//! UseCase: 参加者接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectParticipantUseCase::execute() メソッド
//! - ルーム名の正規化、存在確認、参加と履歴の再送
//!
//! ### なぜこのテストが必要か
//! - 存在しないルームへの接続で購読者が作られないことを保証
//! - 参加直後に履歴が再送されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：既存ルームへの参加（大文字・空白を含む名前でも可）
//! - 異常系：存在しないルーム、空のルーム名

use std::sync::Arc;

use crate::domain::{ConnectionHandle, REPLAY_LIMIT, RoomName, RoomRepository};

use super::error::ConnectError;

/// 参加結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedRoom {
    /// 正規化済みのルーム名
    pub room: RoomName,
    /// 再送した履歴の件数
    pub replayed: usize,
}

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
}

impl ConnectParticipantUseCase {
    /// 新しい ConnectParticipantUseCase を作成
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 参加者接続を実行
    ///
    /// # Arguments
    ///
    /// * `raw_room` - クライアントが指定したルーム名（正規化前）
    /// * `handle` - 接続ハンドル
    ///
    /// # Returns
    ///
    /// * `Ok(JoinedRoom)` - 参加成功（直近 50 件の履歴を再送済み）
    /// * `Err(ConnectError)` - ルームが存在しない
    pub async fn execute(
        &self,
        raw_room: &str,
        handle: ConnectionHandle,
    ) -> Result<JoinedRoom, ConnectError> {
        // 1. ルーム名の正規化（空の名前のルームは存在しない）
        let room = RoomName::new(raw_room).map_err(|_| ConnectError::RoomNotFound)?;

        // 2. 参加と履歴の再送
        let replayed = self
            .repository
            .join(&room, handle, REPLAY_LIMIT)
            .await
            .map_err(|_| ConnectError::RoomNotFound)?;

        Ok(JoinedRoom { room, replayed })
    }
}
