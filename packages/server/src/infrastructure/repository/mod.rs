//! Repository の実装
//!
//! - `inmemory`: HashMap / Vec をストレージとして使う実装
//! - `sqlite`: rusqlite を使う永続化実装

pub mod inmemory;
pub mod sqlite;

pub use inmemory::{InMemoryMessageRepository, InMemoryPresenceRepository, InMemoryRoomRepository};
pub use sqlite::SqliteStore;
