//! エンティティ

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::{
    error::ValueObjectError,
    value_object::{ConnectionId, MessageContent, MessageId, RoomId, Timestamp, UserId},
};

/// 接続ごとの送信キュー（有界）
///
/// 受信側は UI 層の writer タスクがソケットへ書き出す。
pub type PusherChannel = mpsc::Sender<String>;

/// ライブ接続のハンドル
///
/// `user_id` は接続時に確定し、接続の生存期間中は変わらない。
/// clone しても同じ送信キューを指す。
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: ConnectionId,
    pub user_id: UserId,
    sender: PusherChannel,
}

impl Connection {
    pub fn new(user_id: UserId, sender: PusherChannel) -> Self {
        Self {
            id: ConnectionId::generate(),
            user_id,
            sender,
        }
    }

    pub fn sender(&self) -> &PusherChannel {
        &self.sender
    }
}

/// クライアントから届いた、検証前のメッセージ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageDraft {
    pub sender: String,
    pub room_id: String,
    pub content: String,
}

/// 検証済み・採番済みのチャットメッセージ
///
/// このシリアライズ形式がそのまま配信される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub user_id: UserId,
    pub room_id: RoomId,
    pub content: MessageContent,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    /// 下書きを検証し、サーバー側の ID とタイムスタンプを付与する
    ///
    /// 送信者・ルーム・本文のいずれかが空の場合はエラー。
    pub fn accept(draft: MessageDraft, timestamp: Timestamp) -> Result<Self, ValueObjectError> {
        let user_id = UserId::new(draft.sender)?;
        let room_id = RoomId::new(draft.room_id)?;
        let content = MessageContent::new(draft.content)?;

        Ok(Self {
            id: MessageId::generate(),
            user_id,
            room_id,
            content,
            timestamp,
        })
    }
}

/// プレゼンス記録（ユーザーごとに最新の 1 件のみ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    pub user_id: UserId,
    pub online: bool,
    pub last_seen: Timestamp,
}

impl Presence {
    pub fn online(user_id: UserId, now: Timestamp) -> Self {
        Self {
            user_id,
            online: true,
            last_seen: now,
        }
    }

    pub fn offline(user_id: UserId, now: Timestamp) -> Self {
        Self {
            user_id,
            online: false,
            last_seen: now,
        }
    }
}

/// ルームのメタデータとメンバー
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub members: Vec<UserId>,
}

impl Room {
    pub fn new(id: RoomId, name: String, members: Vec<UserId>) -> Self {
        let mut room = Self {
            id,
            name,
            members: Vec::with_capacity(members.len()),
        };
        for member in members {
            room.add_member(member);
        }
        room
    }

    /// メンバーを追加（既に含まれていれば何もしない）
    pub fn add_member(&mut self, user_id: UserId) {
        if !self.members.contains(&user_id) {
            self.members.push(user_id);
        }
    }

    pub fn remove_member(&mut self, user_id: &UserId) {
        self.members.retain(|member| member != user_id);
    }
}
