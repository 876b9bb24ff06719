//! SQLite Presence Repository 実装

use async_trait::async_trait;
use rusqlite::{OptionalExtension, params};

use super::{SqliteStore, corrupt_row, storage};
use crate::domain::{Presence, PresenceRepository, RepositoryError, Timestamp, UserId};

fn into_presence(
    (user_id, online, last_seen): (String, bool, i64),
) -> Result<Presence, RepositoryError> {
    Ok(Presence {
        user_id: UserId::new(user_id).map_err(corrupt_row)?,
        online,
        last_seen: Timestamp::new(last_seen),
    })
}

#[async_trait]
impl PresenceRepository for SqliteStore {
    async fn upsert(&self, presence: Presence) -> Result<(), RepositoryError> {
        self.with_connection(move |conn| {
            conn.execute(
                "INSERT INTO presence (user_id, online, last_seen) VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_id) DO UPDATE SET online = excluded.online, last_seen = excluded.last_seen",
                params![
                    presence.user_id.as_str(),
                    presence.online,
                    presence.last_seen.value(),
                ],
            )
            .map_err(storage)?;
            Ok(())
        })
        .await
    }

    async fn get(&self, user_id: &UserId) -> Result<Option<Presence>, RepositoryError> {
        let user_id = user_id.clone();
        self.with_connection(move |conn| {
            conn.query_row(
                "SELECT user_id, online, last_seen FROM presence WHERE user_id = ?1",
                params![user_id.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(storage)?
            .map(into_presence)
            .transpose()
        })
        .await
    }

    async fn list_online(&self) -> Result<Vec<Presence>, RepositoryError> {
        self.with_connection(|conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT user_id, online, last_seen FROM presence WHERE online = 1 ORDER BY user_id",
                )
                .map_err(storage)?;
            let rows = stmt
                .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
                .map_err(storage)?
                .collect::<Result<Vec<(String, bool, i64)>, _>>()
                .map_err(storage)?;
            rows.into_iter().map(into_presence).collect()
        })
        .await
    }
}
