//! UseCase 層
//!
//! ライブ接続ハブの中核（プレゼンス追跡・ブロードキャスト・接続ごとの
//! Ingest Loop）と、HTTP API の読み取り系ユースケース。

mod broadcast;
mod connect_participant;
mod disconnect_participant;
mod error;
mod get_history;
mod get_presence;
mod ingest;
mod manage_rooms;
mod send_message;
mod track_presence;

pub use broadcast::BroadcastEngine;
pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::DisconnectParticipantUseCase;
pub use error::{GetPresenceError, PresenceError, RoomUseCaseError, SendMessageError};
pub use get_history::GetHistoryUseCase;
pub use get_presence::GetPresenceUseCase;
pub use ingest::{InboundFrame, IngestLoop, IngestSummary};
pub use manage_rooms::{CreateRoomUseCase, GetRoomsUseCase, RoomMembershipUseCase};
pub use send_message::{SendMessageUseCase, SendReport};
pub use track_presence::PresenceTracker;
