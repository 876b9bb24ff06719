//! UseCase: 参加者切断処理
//!
//! 接続を Registry から外し（紐付けも同時に消える）、オフライン遷移を書き込む。
//! 同一ユーザーの他の接続が残っていてもオフラインを書き込む（ユーザー単位の集約はしない）。

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::domain::{Connection, ConnectionRegistry, Timestamp};

use super::{error::PresenceError, track_presence::PresenceTracker};

/// 参加者切断のユースケース
pub struct DisconnectParticipantUseCase {
    registry: Arc<dyn ConnectionRegistry>,
    presence: Arc<PresenceTracker>,
    clock: Arc<dyn Clock>,
}

impl DisconnectParticipantUseCase {
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

    /// 登録を解除してオフラインにする
    ///
    /// 登録解除はプレゼンス書き込みの成否にかかわらず完了する。
    pub async fn execute(&self, connection: &Connection) -> Result<(), PresenceError> {
        let removed = self.registry.unregister(&connection.id).await;
        if removed {
            tracing::info!(
                connection_id = %connection.id,
                user_id = %connection.user_id,
                "connection unregistered"
            );
        } else {
            tracing::debug!(connection_id = %connection.id, "connection was already unregistered");
        }

        let now = Timestamp::new(self.clock.now_millis());
        self.presence.on_disconnect(&connection.user_id, now).await
    }
}
