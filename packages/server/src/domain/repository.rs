//! Repository trait 定義
//!
//! ドメイン層が必要とするデータアクセスのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{
    BroadcastReport, ChatMessage, ConnectionHandle, ConnectionId, RepositoryError, Room, RoomName,
};

/// 退出処理の結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeaveOutcome {
    /// 購読者集合から実際に削除されたか
    pub removed: bool,
    /// 最後の購読者だったため、ルームが削除されたか
    pub room_deleted: bool,
}

/// Room Repository trait
///
/// ルーム名からルーム状態（購読者集合とメッセージ履歴）への対応を所有します。
/// 全ての操作は複数の接続タスクから同時に呼ばれても安全でなければなりません。
///
/// ## 依存性の逆転（DIP）
///
/// - ドメイン層が必要とするインターフェースをドメイン層自身が定義
/// - Infrastructure 層がドメイン層のインターフェースに依存
/// - ドメイン層は Infrastructure 層に依存しない
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 存在するルーム名の一覧（昇順）
    async fn list_rooms(&self) -> Vec<RoomName>;

    /// 空のルームを作成
    async fn create_room(&self, name: RoomName) -> Result<(), RepositoryError>;

    /// ルームのスナップショットを取得
    async fn get_room(&self, name: &RoomName) -> Result<Room, RepositoryError>;

    /// ルームと履歴を削除（存在しなくてもエラーにしない）
    async fn delete_room(&self, name: &RoomName);

    /// 直近 `limit` 件のメッセージを古い順に取得
    async fn get_messages(
        &self,
        name: &RoomName,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// 購読者として参加し、直近 `replay_limit` 件の履歴を再送する
    ///
    /// 参加と再送は 1 つのクリティカルセクションで行われるため、
    /// 再送が終わる前にブロードキャストが割り込むことはない。
    /// 再送した件数を返す。
    async fn join(
        &self,
        name: &RoomName,
        handle: ConnectionHandle,
        replay_limit: usize,
    ) -> Result<usize, RepositoryError>;

    /// 購読者から外す。ルームが空になった場合はルームを削除する
    ///
    /// ルームや購読者が存在しない場合は何もしない。
    async fn leave(&self, name: &RoomName, connection_id: &ConnectionId) -> LeaveOutcome;

    /// 履歴に追加して全購読者に送る
    async fn broadcast(
        &self,
        name: &RoomName,
        message: ChatMessage,
    ) -> Result<BroadcastReport, RepositoryError>;

    /// 購読者数を取得
    async fn subscriber_count(&self, name: &RoomName) -> Result<usize, RepositoryError>;
}
