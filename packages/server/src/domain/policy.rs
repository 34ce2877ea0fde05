//! ルーム作成の認可ポリシー
//!
//! 認証そのものはこのシステムの範囲外です。ルーム作成の可否だけを
//! 外部から注入される判定として扱います。

/// ルーム作成を許可するかどうかの判定
pub trait RoomCreationPolicy: Send + Sync {
    /// `requester` はリクエストに付与されたユーザー名（なければ `None`）
    fn can_create_room(&self, requester: Option<&str>) -> bool;
}

/// 常に許可する
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl RoomCreationPolicy for AllowAll {
    fn can_create_room(&self, _requester: Option<&str>) -> bool {
        true
    }
}

/// ユーザー名が付与されたリクエストのみ許可する
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireUser;

impl RoomCreationPolicy for RequireUser {
    fn can_create_room(&self, requester: Option<&str>) -> bool {
        requester.is_some_and(|user| !user.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allow_all_accepts_anonymous() {
        // テスト項目: AllowAll はユーザー名なしでも許可する
        // given (前提条件):
        let policy = AllowAll;

        // when (操作):
        let allowed = policy.can_create_room(None);

        // then (期待する結果):
        assert!(allowed);
    }

    #[test]
    fn test_require_user_rejects_missing_or_blank_user() {
        // テスト項目: RequireUser はユーザー名がない・空白のみの場合に拒否する
        // given (前提条件):
        let policy = RequireUser;

        // when (操作):

        // then (期待する結果):
        assert!(!policy.can_create_room(None));
        assert!(!policy.can_create_room(Some("  ")));
        assert!(policy.can_create_room(Some("alice")));
    }
}
