//! Connection Registry trait
//!
//! ライブ接続の集合と、接続 → ルームの紐付け（room binding）を管理する。
//! 全操作は単一の排他領域で実行され、接続集合と紐付けが食い違った状態は
//! 外部から観測できない。

use async_trait::async_trait;

use super::{Connection, ConnectionId, RoomId};

#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// 紐付けなしで接続を登録する
    async fn register(&self, connection: Connection);

    /// 接続と紐付けを削除する。存在しなければ何もしない
    ///
    /// 削除した場合は `true`
    async fn unregister(&self, connection_id: &ConnectionId) -> bool;

    /// 接続のルーム紐付けを上書きする
    ///
    /// 未登録の接続は無視し `false` を返す。ルームの存在は確認しない。
    async fn bind(&self, connection_id: &ConnectionId, room_id: RoomId) -> bool;

    /// 指定ルームに紐付いている接続のスナップショット
    async fn subscribers(&self, room_id: &RoomId) -> Vec<Connection>;

    /// 接続の現在の紐付け
    async fn binding_of(&self, connection_id: &ConnectionId) -> Option<RoomId>;

    /// 登録中の接続数
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
