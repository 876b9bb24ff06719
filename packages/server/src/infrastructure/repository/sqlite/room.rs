//! SQLite Room Repository 実装
//!
//! メンバーは `room_members` テーブルに 1 行ずつ保持する。

use async_trait::async_trait;
use rusqlite::{Connection, OptionalExtension, params};

use super::{SqliteStore, corrupt_row, storage};
use crate::domain::{RepositoryError, Room, RoomId, RoomRepository, UserId};

fn room_exists(conn: &Connection, room_id: &str) -> Result<bool, RepositoryError> {
    conn.query_row("SELECT 1 FROM rooms WHERE id = ?1", params![room_id], |_| Ok(()))
        .optional()
        .map(|found| found.is_some())
        .map_err(storage)
}

fn load_members(conn: &Connection, room_id: &str) -> Result<Vec<UserId>, RepositoryError> {
    let mut stmt = conn
        .prepare("SELECT user_id FROM room_members WHERE room_id = ?1 ORDER BY rowid")
        .map_err(storage)?;
    let members = stmt
        .query_map(params![room_id], |row| row.get::<_, String>(0))
        .map_err(storage)?
        .collect::<Result<Vec<String>, _>>()
        .map_err(storage)?;
    members
        .into_iter()
        .map(|member| UserId::new(member).map_err(corrupt_row))
        .collect()
}

fn load_room(conn: &Connection, id: String, name: String) -> Result<Room, RepositoryError> {
    let members = load_members(conn, &id)?;
    Ok(Room {
        id: RoomId::new(id).map_err(corrupt_row)?,
        name,
        members,
    })
}

#[async_trait]
impl RoomRepository for SqliteStore {
    async fn create(&self, room: Room) -> Result<(), RepositoryError> {
        self.with_connection(move |conn| {
            let tx = conn.transaction().map_err(storage)?;
            if room_exists(&tx, room.id.as_str())? {
                return Err(RepositoryError::RoomAlreadyExists(
                    room.id.as_str().to_string(),
                ));
            }
            tx.execute(
                "INSERT INTO rooms (id, name) VALUES (?1, ?2)",
                params![room.id.as_str(), room.name],
            )
            .map_err(storage)?;
            for member in &room.members {
                tx.execute(
                    "INSERT OR IGNORE INTO room_members (room_id, user_id) VALUES (?1, ?2)",
                    params![room.id.as_str(), member.as_str()],
                )
                .map_err(storage)?;
            }
            tx.commit().map_err(storage)
        })
        .await
    }

    async fn get(&self, room_id: &RoomId) -> Result<Option<Room>, RepositoryError> {
        let room_id = room_id.clone();
        self.with_connection(move |conn| {
            let row = conn
                .query_row(
                    "SELECT id, name FROM rooms WHERE id = ?1",
                    params![room_id.as_str()],
                    |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
                )
                .optional()
                .map_err(storage)?;
            row.map(|(id, name)| load_room(conn, id, name)).transpose()
        })
        .await
    }

    async fn list(&self) -> Result<Vec<Room>, RepositoryError> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare("SELECT id, name FROM rooms ORDER BY rowid")
                .map_err(storage)?;
            let rows = stmt
                .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))
                .map_err(storage)?
                .collect::<Result<Vec<_>, _>>()
                .map_err(storage)?;
            rows.into_iter()
                .map(|(id, name)| load_room(conn, id, name))
                .collect()
        })
        .await
    }

    async fn add_member(&self, room_id: &RoomId, user_id: UserId) -> Result<(), RepositoryError> {
        let room_id = room_id.clone();
        self.with_connection(move |conn| {
            if !room_exists(conn, room_id.as_str())? {
                return Err(RepositoryError::RoomNotFound(room_id.into_string()));
            }
            conn.execute(
                "INSERT OR IGNORE INTO room_members (room_id, user_id) VALUES (?1, ?2)",
                params![room_id.as_str(), user_id.as_str()],
            )
            .map_err(storage)?;
            Ok(())
        })
        .await
    }

    async fn remove_member(
        &self,
        room_id: &RoomId,
        user_id: &UserId,
    ) -> Result<(), RepositoryError> {
        let room_id = room_id.clone();
        let user_id = user_id.clone();
        self.with_connection(move |conn| {
            if !room_exists(conn, room_id.as_str())? {
                return Err(RepositoryError::RoomNotFound(room_id.into_string()));
            }
            conn.execute(
                "DELETE FROM room_members WHERE room_id = ?1 AND user_id = ?2",
                params![room_id.as_str(), user_id.as_str()],
            )
            .map_err(storage)?;
            Ok(())
        })
        .await
    }
}
