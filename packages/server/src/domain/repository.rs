//! Repository trait 定義
//!
//! ドメイン層が必要とする永続化コラボレータのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! - `MessageRepository`: メッセージ履歴
//! - `PresenceRepository`: ユーザーごとの最新プレゼンス（upsert）
//! - `RoomRepository`: ルームのメタデータとメンバー

use async_trait::async_trait;

use super::{ChatMessage, Presence, RepositoryError, Room, RoomId, UserId};

/// メッセージ履歴の永続化
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// メッセージを保存
    async fn save(&self, message: &ChatMessage) -> Result<(), RepositoryError>;

    /// 全ルームの新しい順に最大 `limit` 件を取得
    async fn list(&self, limit: usize) -> Result<Vec<ChatMessage>, RepositoryError>;

    /// 指定ルームの新しい順に最大 `limit` 件を取得
    async fn list_by_room(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError>;
}

/// プレゼンスの永続化（ユーザー ID をキーとする upsert）
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// プレゼンスを書き込む（後勝ち、履歴は残さない）
    async fn upsert(&self, presence: Presence) -> Result<(), RepositoryError>;

    /// 指定ユーザーのプレゼンスを取得
    async fn get(&self, user_id: &UserId) -> Result<Option<Presence>, RepositoryError>;

    /// オンラインのユーザー一覧を取得
    async fn list_online(&self) -> Result<Vec<Presence>, RepositoryError>;
}

/// ルームの永続化
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// ルームを作成
    async fn create(&self, room: Room) -> Result<(), RepositoryError>;

    /// ルームを取得
    async fn get(&self, room_id: &RoomId) -> Result<Option<Room>, RepositoryError>;

    /// 全ルームを取得
    async fn list(&self) -> Result<Vec<Room>, RepositoryError>;

    /// メンバーを追加（冪等）
    async fn add_member(&self, room_id: &RoomId, user_id: UserId) -> Result<(), RepositoryError>;

    /// メンバーを削除
    async fn remove_member(&self, room_id: &RoomId, user_id: &UserId)
    -> Result<(), RepositoryError>;
}
