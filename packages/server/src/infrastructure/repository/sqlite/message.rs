//! SQLite Message Repository 実装

use async_trait::async_trait;
use rusqlite::{Connection, params};

use super::{SqliteStore, corrupt_row, sql_limit, storage};
use crate::domain::{
    ChatMessage, MessageContent, MessageId, MessageRepository, RepositoryError, RoomId, Timestamp,
    UserId,
};

type MessageRow = (String, String, String, String, i64);

fn into_message(
    (id, user_id, room_id, content, timestamp): MessageRow,
) -> Result<ChatMessage, RepositoryError> {
    Ok(ChatMessage {
        id: MessageId::parse(&id).map_err(corrupt_row)?,
        user_id: UserId::new(user_id).map_err(corrupt_row)?,
        room_id: RoomId::new(room_id).map_err(corrupt_row)?,
        content: MessageContent::new(content).map_err(corrupt_row)?,
        timestamp: Timestamp::new(timestamp),
    })
}

fn query_messages(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<ChatMessage>, RepositoryError> {
    let mut stmt = conn.prepare(sql).map_err(storage)?;
    let rows = stmt
        .query_map(params, |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?))
        })
        .map_err(storage)?
        .collect::<Result<Vec<MessageRow>, _>>()
        .map_err(storage)?;
    rows.into_iter().map(into_message).collect()
}

#[async_trait]
impl MessageRepository for SqliteStore {
    async fn save(&self, message: &ChatMessage) -> Result<(), RepositoryError> {
        let message = message.clone();
        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO messages (id, user_id, room_id, content, timestamp) VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    message.id.to_string(),
                    message.user_id.as_str(),
                    message.room_id.as_str(),
                    message.content.as_str(),
                    message.timestamp.value(),
                ],
            )
            .map_err(storage)?;
            Ok(())
        })
        .await
    }

    async fn list(&self, limit: usize) -> Result<Vec<ChatMessage>, RepositoryError> {
        self.with_connection(move |conn| {
            query_messages(
                conn,
                "SELECT id, user_id, room_id, content, timestamp FROM messages
                 ORDER BY timestamp DESC, rowid DESC LIMIT ?1",
                params![sql_limit(limit)],
            )
        })
        .await
    }

    async fn list_by_room(
        &self,
        room_id: &RoomId,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, RepositoryError> {
        let room_id = room_id.clone();
        self.with_connection(move |conn| {
            query_messages(
                conn,
                "SELECT id, user_id, room_id, content, timestamp FROM messages
                 WHERE room_id = ?1 ORDER BY timestamp DESC, rowid DESC LIMIT ?2",
                params![room_id.as_str(), sql_limit(limit)],
            )
        })
        .await
    }
}
