//! 値オブジェクト
//!
//! 生成時にバリデーションを行い、不正な値が存在しないことを型で保証します。

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::ValidationError;

/// 名前の指定がないユーザーの表示名
pub const DEFAULT_USER_NAME: &str = "Anonymous";

/// ルーム名
///
/// 前後の空白を除去し、小文字に正規化した値を保持します。
/// 検索・保存は常に正規化後の値で行われます。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomName(String);

impl RoomName {
    /// 正規化してルーム名を作成
    ///
    /// # Errors
    ///
    /// 正規化後に空文字列になる場合は `ValidationError::EmptyRoomName`
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let normalized = raw.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::EmptyRoomName);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for RoomName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for RoomName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// メッセージ本文（前後の空白を除去した、空でない文字列）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContent(String);

impl MessageContent {
    /// # Errors
    ///
    /// 空白除去後に空文字列になる場合は `ValidationError::EmptyMessageContent`
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyMessageContent);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageContent {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// 送信者の表示名（自由入力のラベル）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserName(String);

impl UserName {
    /// 未指定または空白のみの場合は `"Anonymous"` になる
    ///
    /// それ以外は受け取った文字列をそのまま保持する
    pub fn new(raw: Option<&str>) -> Self {
        match raw {
            Some(name) if !name.trim().is_empty() => Self(name.to_string()),
            _ => Self::anonymous(),
        }
    }

    pub fn anonymous() -> Self {
        Self(DEFAULT_USER_NAME.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl Default for UserName {
    fn default() -> Self {
        Self::anonymous()
    }
}

/// メッセージ ID（UUID v4）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(Uuid);

impl MessageId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 接続 ID（UUID v4）
///
/// 1 つの WebSocket 接続を識別します。再接続すると別の ID になります。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// UTC のタイムスタンプ
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    pub fn new(value: DateTime<Utc>) -> Self {
        Self(value)
    }

    pub fn value(&self) -> DateTime<Utc> {
        self.0
    }

    /// RFC 3339 形式（UTC, `Z` 付き）
    pub fn to_rfc3339(&self) -> String {
        hiroba_shared::time::to_rfc3339_utc(&self.0)
    }
}
