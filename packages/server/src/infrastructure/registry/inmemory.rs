//! インメモリ Connection Registry 実装
//!
//! 接続マップ・紐付けマップ・ルーム索引の 3 つを 1 つの Mutex で守る。
//! ロック中に await する箇所はなく、購読者の取得はハンドルをコピーしてから
//! ロックを解放する。

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Connection, ConnectionId, ConnectionRegistry, RoomId};

#[derive(Default)]
struct RegistryState {
    connections: HashMap<ConnectionId, Connection>,
    bindings: HashMap<ConnectionId, RoomId>,
    /// bindings の逆引き。空になったルームのエントリは削除する
    rooms: HashMap<RoomId, HashSet<ConnectionId>>,
}

impl RegistryState {
    fn detach(&mut self, connection_id: &ConnectionId) -> Option<RoomId> {
        let previous = self.bindings.remove(connection_id)?;
        if let Some(members) = self.rooms.get_mut(&previous) {
            members.remove(connection_id);
            if members.is_empty() {
                self.rooms.remove(&previous);
            }
        }
        Some(previous)
    }
}

/// インメモリ Connection Registry
#[derive(Default)]
pub struct InMemoryConnectionRegistry {
    state: Mutex<RegistryState>,
}

impl InMemoryConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(&self, connection: Connection) {
        let connection_id = connection.id;
        let mut state = self.state.lock().await;
        state.connections.insert(connection_id, connection);
        tracing::debug!(connection_id = %connection_id, "connection registered");
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> bool {
        let mut state = self.state.lock().await;
        let removed = state.connections.remove(connection_id).is_some();
        state.detach(connection_id);
        if removed {
            tracing::debug!(connection_id = %connection_id, "connection unregistered");
        }
        removed
    }

    async fn bind(&self, connection_id: &ConnectionId, room_id: RoomId) -> bool {
        let mut state = self.state.lock().await;
        if !state.connections.contains_key(connection_id) {
            tracing::debug!(connection_id = %connection_id, "bind ignored for unknown connection");
            return false;
        }
        if state.bindings.get(connection_id) == Some(&room_id) {
            return true;
        }

        state.detach(connection_id);
        state
            .rooms
            .entry(room_id.clone())
            .or_default()
            .insert(*connection_id);
        state.bindings.insert(*connection_id, room_id);
        true
    }

    async fn subscribers(&self, room_id: &RoomId) -> Vec<Connection> {
        let state = self.state.lock().await;
        let Some(members) = state.rooms.get(room_id) else {
            return Vec::new();
        };
        members
            .iter()
            .filter_map(|connection_id| state.connections.get(connection_id).cloned())
            .collect()
    }

    async fn binding_of(&self, connection_id: &ConnectionId) -> Option<RoomId> {
        let state = self.state.lock().await;
        state.bindings.get(connection_id).cloned()
    }

    async fn len(&self) -> usize {
        let state = self.state.lock().await;
        state.connections.len()
    }
}
