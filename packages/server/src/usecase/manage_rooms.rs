//! UseCase: ルームの作成・参照・参加/退出
//!
//! ルームのメタデータとメンバーは永続化コラボレータが持つ。
//! ライブ配信の対象（接続のルーム紐付け）とは独立しており、ここでの参加/退出は
//! Registry を変更しない。

use std::sync::Arc;

use crate::domain::{Room, RoomId, RoomRepository, UserId};

use super::error::RoomUseCaseError;

/// ルーム作成
pub struct CreateRoomUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl CreateRoomUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    /// 新しい ID でルームを作成する
    ///
    /// メンバーが空なら作成者だけのルームになる。名前が空ならエラー。
    pub async fn execute(
        &self,
        creator: &UserId,
        name: String,
        members: Vec<String>,
    ) -> Result<Room, RoomUseCaseError> {
        if name.trim().is_empty() {
            return Err(RoomUseCaseError::InvalidName);
        }

        let members = if members.is_empty() {
            vec![creator.clone()]
        } else {
            members
                .into_iter()
                .map(UserId::new)
                .collect::<Result<Vec<_>, _>>()?
        };

        let room = Room::new(RoomId::generate(), name, members);
        self.repository.create(room.clone()).await?;
        tracing::info!(room_id = %room.id, creator = %creator, "room created");
        Ok(room)
    }
}

/// ルーム参照
pub struct GetRoomsUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl GetRoomsUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> Result<Vec<Room>, RoomUseCaseError> {
        Ok(self.repository.list().await?)
    }

    pub async fn detail(&self, room_id: &RoomId) -> Result<Room, RoomUseCaseError> {
        self.repository
            .get(room_id)
            .await?
            .ok_or_else(|| RoomUseCaseError::RoomNotFound(room_id.as_str().to_string()))
    }
}

/// ルームへの参加・退出
pub struct RoomMembershipUseCase {
    repository: Arc<dyn RoomRepository>,
}

impl RoomMembershipUseCase {
    pub fn new(repository: Arc<dyn RoomRepository>) -> Self {
        Self { repository }
    }

    pub async fn join(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), RoomUseCaseError> {
        self.repository.add_member(room_id, user_id.clone()).await?;
        tracing::debug!(room_id = %room_id, user_id = %user_id, "joined room");
        Ok(())
    }

    pub async fn leave(&self, room_id: &RoomId, user_id: &UserId) -> Result<(), RoomUseCaseError> {
        self.repository.remove_member(room_id, user_id).await?;
        tracing::debug!(room_id = %room_id, user_id = %user_id, "left room");
        Ok(())
    }
}
