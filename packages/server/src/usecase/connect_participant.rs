//! UseCase: 参加者接続処理
//!
//! 認証済みの接続を Registry に登録し（紐付けなし）、オンライン遷移を書き込む。
//! 登録を先に行うため、プレゼンス書き込みが失敗しても接続は有効なまま。

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::domain::{Connection, ConnectionRegistry, Timestamp};

use super::{error::PresenceError, track_presence::PresenceTracker};

/// 参加者接続のユースケース
pub struct ConnectParticipantUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    presence: Arc<PresenceTracker>,
    clock: Arc<dyn Clock>,
}

impl ConnectParticipantUseCase {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        presence: Arc<PresenceTracker>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            registry,
            presence,
            clock,
        }
    }

    /// 接続を登録してオンラインにする
    ///
    /// `Err` はプレゼンス書き込みの失敗のみ。その場合も登録は完了している。
    pub async fn execute(&self, connection: Connection) -> Result<(), PresenceError> {
        let user_id = connection.user_id.clone();
        let connection_id = connection.id;

        self.registry.register(connection).await;
        tracing::info!(connection_id = %connection_id, user_id = %user_id, "connection registered");

        let now = Timestamp::new(self.clock.now_millis());
        self.presence.on_connect(&user_id, now).await
    }
}
