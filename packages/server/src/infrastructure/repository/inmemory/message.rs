//! InMemory Message Repository 実装

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ChatMessage, MessageRepository, RepositoryError, RoomId};

/// インメモリ Message Repository 実装
///
/// 保存順に保持し、取得時はタイムスタンプの新しい順（同時刻なら後から保存した順）で返す。
#[derive(Default)]
pub struct InMemoryMessageRepository {
    messages: Mutex<Vec<ChatMessage>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn newest_first<'a>(
        messages: impl DoubleEndedIterator<Item = &'a ChatMessage>,
        limit: usize,
    ) -> Vec<ChatMessage> {
        let mut selected: Vec<ChatMessage> = messages.rev().cloned().collect();
        // 安定ソートなので同時刻は後から保存したものが先に来る
        selected.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        selected.truncate(limit);
        selected
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn save(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        let mut messages = self.messages.lock().await;
        messages.push(message.clone());
        Ok(())
    }

    async fn list(&self, limit: usize) -> Result<Vec<ChatMessage>, RepositoryError> {
        let messages = self.messages.lock().await;
        Ok(Self::newest_first(messages.iter(), limit))
    }

    async fn list_by_room(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let messages = self.messages.lock().await;
        Ok(Self::newest_first(
            messages.iter().filter(|m| &m.room_id == room_id),
            limit,
        ))
    }
}
