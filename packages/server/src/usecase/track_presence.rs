//! Presence Tracker
//!
//! 接続ライフサイクルから「接続時オンライン」「切断時オフライン」の 2 つの遷移のみを
//! 導出し、Presence Repository へ upsert する。自身は状態を持たない。

use std::sync::Arc;

use crate::domain::{Presence, PresenceRepository, Timestamp, UserId};

use super::error::PresenceError;

/// プレゼンス遷移の書き込み
pub struct PresenceTracker {
    repository: Arc<dyn PresenceRepository>,
}

impl PresenceTracker {
    pub fn new(repository: Arc<dyn PresenceRepository>) -> Self {
        Self { repository }
    }

    /// `{user, online=true, last_seen=now}` を書き込む
    pub async fn on_connect(&self, user_id: &UserId, now: Timestamp) -> Result<(), PresenceError> {
        self.write(Presence::online(user_id.clone(), now)).await
    }

    /// `{user, online=false, last_seen=now}` を書き込む
    pub async fn on_disconnect(
        &self,
        user_id: &UserId,
        now: Timestamp,
    ) -> Result<(), PresenceError> {
        self.write(Presence::offline(user_id.clone(), now)).await
    }

    async fn write(&self, presence: Presence) -> Result<(), PresenceError> {
        let user_id = presence.user_id.as_str().to_string();
        let online = presence.online;
        self.repository
            .upsert(presence)
            .await
            .map_err(|source| PresenceError { user_id: user_id.clone(), source })?;
        tracing::debug!(user_id = %user_id, online, "presence updated");
        Ok(())
    }
}
