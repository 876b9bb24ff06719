//! InMemory Presence Repository 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Presence, PresenceRepository, RepositoryError, UserId};

/// インメモリ Presence Repository 実装（ユーザー ID ごとに 1 件）
#[derive(Default)]
pub struct InMemoryPresenceRepository {
    records: Mutex<HashMap<UserId, Presence>>,
}

impl InMemoryPresenceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PresenceRepository for InMemoryPresenceRepository {
    async fn upsert(&self, presence: Presence) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().await;
        records.insert(presence.user_id.clone(), presence);
        Ok(())
    }

    async fn get(&self, user_id: &UserId) -> Result<Option<Presence>, RepositoryError> {
        let records = self.records.lock().await;
        Ok(records.get(user_id).cloned())
    }

    async fn list_online(&self) -> Result<Vec<Presence>, RepositoryError> {
        let records = self.records.lock().await;
        let mut online: Vec<Presence> = records.values().filter(|p| p.online).cloned().collect();
        online.sort_by(|a, b| a.user_id.as_str().cmp(b.user_id.as_str()));
        Ok(online)
    }
}
