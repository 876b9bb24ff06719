//! ドメイン層
//!
//! 値オブジェクト・エンティティ・エラー型と、外部コラボレータ
//! （リポジトリ、レジストリ、プッシャー、認証）の trait を定義します。

pub mod entity;
pub mod error;
pub mod identity;
pub mod message_pusher;
pub mod registry;
pub mod repository;
pub mod value_object;

pub use entity::{ChatMessage, Connection, MessageDraft, Presence, PusherChannel, Room};
pub use error::{AuthError, MessagePushError, RepositoryError, ValueObjectError};
pub use identity::IdentityGate;
pub use message_pusher::{DeliveryReport, MessagePusher};
pub use registry::ConnectionRegistry;
pub use repository::{MessageRepository, PresenceRepository, RoomRepository};
pub use value_object::{ConnectionId, MessageContent, MessageId, RoomId, Timestamp, UserId};
