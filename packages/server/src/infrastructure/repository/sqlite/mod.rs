//! SQLite Repository 実装
//!
//! rusqlite は同期 API のため、接続を `Arc<Mutex<Connection>>` で共有し、
//! 各操作を `tokio::task::spawn_blocking` 上で実行する。
//! 1 つの `SqliteStore` が 3 つのリポジトリ trait をすべて実装する。

mod message;
mod presence;
mod room;

use std::{
    path::Path,
    sync::{Arc, Mutex},
};

use rusqlite::Connection;

use crate::domain::RepositoryError;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS messages (
    id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    room_id TEXT NOT NULL,
    content TEXT NOT NULL,
    timestamp INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_messages_timestamp ON messages(timestamp);
CREATE INDEX IF NOT EXISTS idx_messages_room_timestamp ON messages(room_id, timestamp);

CREATE TABLE IF NOT EXISTS presence (
    user_id TEXT PRIMARY KEY,
    online INTEGER NOT NULL,
    last_seen INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS rooms (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS room_members (
    room_id TEXT NOT NULL,
    user_id TEXT NOT NULL,
    PRIMARY KEY (room_id, user_id),
    FOREIGN KEY (room_id) REFERENCES rooms(id) ON DELETE CASCADE
);
";

/// SQLite を使ったストア
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// データベースファイルを開き（なければ作成し）、スキーマを適用する
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let conn = Connection::open(path.as_ref()).map_err(storage)?;
        conn.pragma_update(None, "journal_mode", "WAL")
            .map_err(storage)?;
        let store = Self::initialize(conn)?;
        tracing::info!("Database initialized at {}", path.as_ref().display());
        Ok(store)
    }

    /// インメモリの SQLite を開く（テスト用）
    pub fn open_in_memory() -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory().map_err(storage)?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self, RepositoryError> {
        conn.pragma_update(None, "foreign_keys", "ON")
            .map_err(storage)?;
        conn.execute_batch(SCHEMA).map_err(storage)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// ブロッキングスレッド上で接続を使う
    async fn with_connection<T, F>(&self, f: F) -> Result<T, RepositoryError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, RepositoryError> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut guard = conn
                .lock()
                .map_err(|_| RepositoryError::Storage("database mutex poisoned".to_string()))?;
            f(&mut guard)
        })
        .await
        .map_err(|e| RepositoryError::Storage(e.to_string()))?
    }
}

fn storage(error: rusqlite::Error) -> RepositoryError {
    RepositoryError::Storage(error.to_string())
}

fn corrupt_row(error: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Storage(format!("corrupt row: {}", error))
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory_applies_schema_idempotently() {
        // テスト項目: スキーマは何度適用してもエラーにならない
        // given (前提条件):
        let store = SqliteStore::open_in_memory().unwrap();

        // when (操作):
        let result = store.conn.lock().unwrap().execute_batch(SCHEMA);

        // then (期待する結果):
        assert!(result.is_ok());
    }

    #[test]
    fn test_sql_limit_saturates() {
        // テスト項目: usize の上限は i64::MAX に丸められる
        // given (前提条件):

        // when (操作):

        // then (期待する結果):
        assert_eq!(sql_limit(50), 50);
        assert_eq!(sql_limit(usize::MAX), i64::MAX);
    }
}
