//! UseCase: プレゼンスの参照

use std::sync::Arc;

use crate::domain::{Presence, PresenceRepository, UserId};

use super::error::GetPresenceError;

pub struct GetPresenceUseCase {
    repository: Arc<dyn PresenceRepository>,
}

impl GetPresenceUseCase {
    pub fn new(repository: Arc<dyn PresenceRepository>) -> Self {
        Self { repository }
    }

    /// 指定ユーザーの最新プレゼンス
    pub async fn get(&self, user_id: &UserId) -> Result<Presence, GetPresenceError> {
        self.repository
            .get(user_id)
            .await?
            .ok_or_else(|| GetPresenceError::NotFound(user_id.as_str().to_string()))
    }

    /// オンラインのユーザー一覧
    pub async fn online(&self) -> Result<Vec<Presence>, GetPresenceError> {
        Ok(self.repository.list_online().await?)
    }
}
