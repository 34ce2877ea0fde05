//! InMemory Room Repository 実装
//!
//! ドメイン層が定義する RoomRepository trait の具体的な実装。
//! HashMap をインメモリ DB として使用します。
//!
//! ## ロック
//!
//! ```text
//! rooms: RwLock<HashMap<RoomName, Arc<Mutex<Room>>>>
//!          └─ マップのロック          └─ ルームごとのロック
//! ```
//!
//! - ロックの取得順序は常に「マップ → ルーム」
//! - `join` / `broadcast` はマップの読み取りロックを保持したままルームをロックする
//! - ルームの削除はマップの書き込みロック＋ルームのロックの下で空であることを再確認する
//!
//! これにより、削除済みのルームに参加してしまうことはありません。
//! 異なるルームの操作同士は直列化されません。
//!
//! ## ルームの自動削除
//!
//! 最後の購読者が退出したルームは履歴ごと即座に削除されます。
//! 同名のルームを作り直しても履歴は空です。
//! デフォルトルームだけは削除直後に空の状態で作り直されます。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use hiroba_shared::time::{Clock, SystemClock};
use tokio::sync::{Mutex, RwLock};

use crate::domain::{
    BroadcastReport, ChatMessage, ConnectionHandle, ConnectionId, LeaveOutcome, RepositoryError,
    Room, RoomName, RoomRepository, Timestamp,
};

/// インメモリ Room Repository 実装
pub struct InMemoryRoomRepository {
    /// ルーム名 → ルーム
    rooms: RwLock<HashMap<RoomName, Arc<Mutex<Room>>>>,
    /// 削除されても空の状態で作り直されるルーム
    default_room: Option<RoomName>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRoomRepository {
    /// ルームが 1 つもない状態で作成
    pub fn new() -> Self {
        Self::with_clock(None, Arc::new(SystemClock))
    }

    /// デフォルトルームを作成した状態で作成
    pub fn with_default_room(default_room: RoomName) -> Self {
        Self::with_clock(Some(default_room), Arc::new(SystemClock))
    }

    /// 時刻の取得元を指定して作成
    pub fn with_clock(default_room: Option<RoomName>, clock: Arc<dyn Clock>) -> Self {
        let mut rooms = HashMap::new();
        if let Some(name) = &default_room {
            rooms.insert(
                name.clone(),
                Arc::new(Mutex::new(Room::new(name.clone(), Timestamp::new(clock.now())))),
            );
            tracing::info!("Default room '{}' created", name);
        }
        Self {
            rooms: RwLock::new(rooms),
            default_room,
            clock,
        }
    }

    fn new_room(&self, name: RoomName) -> Arc<Mutex<Room>> {
        Arc::new(Mutex::new(Room::new(name, Timestamp::new(self.clock.now()))))
    }

    /// `room` がまだ登録されていて、かつ空であれば削除する
    ///
    /// 削除した場合は `true`
    async fn remove_if_empty(&self, name: &RoomName, room: &Arc<Mutex<Room>>) -> bool {
        let mut rooms = self.rooms.write().await;
        let Some(current) = rooms.get(name) else {
            return false;
        };
        // 削除後に作り直された別インスタンスは対象外
        if !Arc::ptr_eq(current, room) {
            return false;
        }
        if !room.lock().await.is_empty() {
            return false;
        }

        rooms.remove(name);
        tracing::info!("Room '{}' deleted due to no subscribers", name);

        if self.default_room.as_ref() == Some(name) {
            rooms.insert(name.clone(), self.new_room(name.clone()));
            tracing::info!("Default room '{}' recreated empty", name);
        }
        true
    }

    async fn find(&self, name: &RoomName) -> Result<Arc<Mutex<Room>>, RepositoryError> {
        let rooms = self.rooms.read().await;
        rooms
            .get(name)
            .cloned()
            .ok_or_else(|| RepositoryError::RoomNotFound(name.to_string()))
    }
}

impl Default for InMemoryRoomRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RoomRepository for InMemoryRoomRepository {
    async fn list_rooms(&self) -> Vec<RoomName> {
        let rooms = self.rooms.read().await;
        let mut names: Vec<RoomName> = rooms.keys().cloned().collect();
        names.sort();
        names
    }

    async fn create_room(&self, name: RoomName) -> Result<(), RepositoryError> {
        let mut rooms = self.rooms.write().await;
        if rooms.contains_key(&name) {
            return Err(RepositoryError::RoomAlreadyExists(name.into_string()));
        }
        let room = self.new_room(name.clone());
        rooms.insert(name.clone(), room);
        tracing::info!("Room created: {}", name);
        Ok(())
    }

    async fn get_room(&self, name: &RoomName) -> Result<Room, RepositoryError> {
        let room = self.find(name).await?;
        let room = room.lock().await;
        Ok(room.clone())
    }

    async fn delete_room(&self, name: &RoomName) {
        let mut rooms = self.rooms.write().await;
        if rooms.remove(name).is_some() {
            tracing::info!("Room deleted: {}", name);
        }
    }

    async fn get_messages(
        &self,
        name: &RoomName,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let room = self.find(name).await?;
        let room = room.lock().await;
        Ok(room.recent_messages(limit))
    }

    async fn join(
        &self,
        name: &RoomName,
        handle: ConnectionHandle,
        replay_limit: usize,
    ) -> Result<usize, RepositoryError> {
        let rooms = self.rooms.read().await;
        let room = rooms
            .get(name)
            .ok_or_else(|| RepositoryError::RoomNotFound(name.to_string()))?;
        let mut room = room.lock().await;

        room.join(handle.clone());
        let replayed = match room.replay_history(&handle, replay_limit) {
            Ok(count) => count,
            Err(e) => {
                // 接続側の Closed 遷移で leave される
                tracing::warn!(
                    "Failed to replay history to connection '{}': {}",
                    handle.id(),
                    e
                );
                0
            }
        };
        tracing::info!(
            "Connection '{}' joined room '{}', total subscribers: {}",
            handle.id(),
            name,
            room.subscriber_count()
        );
        Ok(replayed)
    }

    async fn leave(&self, name: &RoomName, connection_id: &ConnectionId) -> LeaveOutcome {
        let Ok(room) = self.find(name).await else {
            return LeaveOutcome::default();
        };

        let (removed, abandoned) = {
            let mut guard = room.lock().await;
            let removed = guard.leave(connection_id);
            (removed, guard.is_abandoned())
        };
        if removed {
            tracing::info!("Connection '{}' left room '{}'", connection_id, name);
        }

        // 配信失敗で既に除外済みでも、先行する削除が中断されていればここで削除する
        let room_deleted = abandoned && self.remove_if_empty(name, &room).await;
        LeaveOutcome {
            removed,
            room_deleted,
        }
    }

    async fn broadcast(
        &self,
        name: &RoomName,
        message: ChatMessage,
    ) -> Result<BroadcastReport, RepositoryError> {
        let (mut report, now_empty, room) = {
            let rooms = self.rooms.read().await;
            let room = rooms
                .get(name)
                .cloned()
                .ok_or_else(|| RepositoryError::RoomNotFound(name.to_string()))?;
            let mut guard = room.lock().await;
            let report = guard.broadcast(message);
            let now_empty = guard.is_empty();
            drop(guard);
            (report, now_empty, room)
        };

        if !report.dropped.is_empty() && now_empty {
            report.room_deleted = self.remove_if_empty(name, &room).await;
        }
        Ok(report)
    }

    async fn subscriber_count(&self, name: &RoomName) -> Result<usize, RepositoryError> {
        let room = self.find(name).await?;
        let room = room.lock().await;
        Ok(room.subscriber_count())
    }
}
