//! UseCase: メッセージ履歴の取得

use std::sync::Arc;

use crate::domain::{ChatMessage, MessageRepository, RepositoryError, RoomId};

pub struct GetHistoryUseCase {
    repository: Arc<dyn MessageRepository>,
}

impl GetHistoryUseCase {
    pub fn new(repository: Arc<dyn MessageRepository>) -> Self {
        Self { repository }
    }

    /// 全ルームの新しい順に最大 `limit` 件
    pub async fn recent(&self, limit: usize) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.repository.list(limit).await
    }

    /// 指定ルームの新しい順に最大 `limit` 件
    pub async fn recent_in_room(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.repository.list_by_room(room_id, limit).await
    }
}
