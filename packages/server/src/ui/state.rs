//! Shared application state and dependency wiring.

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::{
    domain::{
        ConnectionRegistry, IdentityGate, MessagePusher, MessageRepository, PresenceRepository,
        RoomRepository,
    },
    infrastructure::{message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry},
    usecase::{
        BroadcastEngine, ConnectParticipantUseCase, CreateRoomUseCase,
        DisconnectParticipantUseCase, GetHistoryUseCase, GetPresenceUseCase, GetRoomsUseCase,
        IngestLoop, PresenceTracker, RoomMembershipUseCase, SendMessageUseCase,
    },
};

/// 外部コラボレータ（永続化・認証・時計）
pub struct Collaborators {
    pub messages: Arc<dyn MessageRepository>,
    pub presence: Arc<dyn PresenceRepository>,
    pub rooms: Arc<dyn RoomRepository>,
    pub identity_gate: Arc<dyn IdentityGate>,
    pub clock: Arc<dyn Clock>,
    /// 接続ごとの送信キュー容量
    pub outbound_queue_capacity: usize,
}

/// Shared application state
pub struct AppState {
    pub identity_gate: Arc<dyn IdentityGate>,
    pub outbound_queue_capacity: usize,
    /// ライブ接続の Registry（ハブ全体で 1 つ）
    pub registry: Arc<dyn ConnectionRegistry>,
    pub ingest_loop: Arc<IngestLoop>,
    pub get_history_usecase: Arc<GetHistoryUseCase>,
    pub get_presence_usecase: Arc<GetPresenceUseCase>,
    pub create_room_usecase: Arc<CreateRoomUseCase>,
    pub get_rooms_usecase: Arc<GetRoomsUseCase>,
    pub room_membership_usecase: Arc<RoomMembershipUseCase>,
}

impl AppState {
    /// Registry と Pusher を生成し、全ユースケースを組み立てる
    pub fn new(collaborators: Collaborators) -> Self {
        let Collaborators {
            messages,
            presence,
            rooms,
            identity_gate,
            clock,
            outbound_queue_capacity,
        } = collaborators;

        // 1. Registry / MessagePusher
        let registry: Arc<dyn ConnectionRegistry> = Arc::new(InMemoryConnectionRegistry::new());
        let message_pusher: Arc<dyn MessagePusher> = Arc::new(WebSocketMessagePusher::new());

        // 2. ハブの中核
        let tracker = Arc::new(PresenceTracker::new(presence.clone()));
        let broadcast = Arc::new(BroadcastEngine::new(registry.clone(), message_pusher));
        let ingest_loop = Arc::new(IngestLoop::new(
            Arc::new(ConnectParticipantUseCase::new(
                registry.clone(),
                tracker.clone(),
                clock.clone(),
            )),
            Arc::new(SendMessageUseCase::new(
                messages.clone(),
                registry.clone(),
                broadcast,
                clock.clone(),
            )),
            Arc::new(DisconnectParticipantUseCase::new(
                registry.clone(),
                tracker,
                clock,
            )),
        ));

        // 3. HTTP API
        Self {
            identity_gate,
            outbound_queue_capacity,
            registry,
            ingest_loop,
            get_history_usecase: Arc::new(GetHistoryUseCase::new(messages)),
            get_presence_usecase: Arc::new(GetPresenceUseCase::new(presence)),
            create_room_usecase: Arc::new(CreateRoomUseCase::new(rooms.clone())),
            get_rooms_usecase: Arc::new(GetRoomsUseCase::new(rooms.clone())),
            room_membership_usecase: Arc::new(RoomMembershipUseCase::new(rooms)),
        }
    }
}
