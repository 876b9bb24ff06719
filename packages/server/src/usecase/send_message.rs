//! UseCase: メッセージ送信処理
//!
//! 受信した下書き 1 件の処理（Ingest Loop の `reading` 状態で有効なフレームを受けた時）。
//!
//! 1. 検証（送信者・ルーム・本文が空なら破棄。保存も配信もしない）
//! 2. ID・サーバー時刻を付与
//! 3. 保存（失敗は報告のみ、配信は続行）
//! 4. 接続のルーム紐付けをメッセージのルームへ上書き
//! 5. Broadcast Engine へ渡す

use std::sync::Arc;

use tsudoi_shared::time::Clock;

use crate::domain::{
    ChatMessage, Connection, ConnectionRegistry, DeliveryReport, MessageDraft, MessageRepository,
    RepositoryError, Timestamp,
};

use super::{broadcast::BroadcastEngine, error::SendMessageError};

/// 1 件の送信処理の結果
#[derive(Debug, Clone)]
pub struct SendReport {
    pub message: ChatMessage,
    /// 保存に失敗した場合のエラー（配信は行われている）
    pub persist_error: Option<RepositoryError>,
    pub delivery: DeliveryReport,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    message_repository: Arc<dyn MessageRepository>,
    registry: Arc<dyn ConnectionRegistry>,
    broadcast: Arc<BroadcastEngine>,
    clock: Arc<dyn Clock>,
}

impl SendMessageUseCase {
    pub fn new(
        message_repository: Arc<dyn MessageRepository>,
        registry: Arc<dyn ConnectionRegistry>,
        broadcast: Arc<BroadcastEngine>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            message_repository,
            registry,
            broadcast,
            clock,
        }
    }

    pub async fn execute(
        &self,
        connection: &Connection,
        draft: MessageDraft,
    ) -> Result<SendReport, SendMessageError> {
        let now = Timestamp::new(self.clock.now_millis());
        let message = ChatMessage::accept(draft, now)?;

        let persist_error = match self.message_repository.save(&message).await {
            Ok(()) => None,
            Err(e) => {
                tracing::error!(
                    message_id = %message.id,
                    room_id = %message.room_id,
                    "failed to persist message: {}",
                    e
                );
                Some(e)
            }
        };

        self.registry
            .bind(&connection.id, message.room_id.clone())
            .await;

        let delivery = self.broadcast.broadcast(&message).await;

        Ok(SendReport {
            message,
            persist_error,
            delivery,
        })
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;
    use tsudoi_shared::time::FixedClock;

    use super::*;
    use crate::{
        domain::{
            RoomId, UserId, ValueObjectError, message_pusher::MockMessagePusher,
            repository::MockMessageRepository,
        },
        infrastructure::{
            message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry,
            repository::InMemoryMessageRepository,
        },
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 有効なメッセージが保存・紐付け・配信されること（送信者自身にも届く）
    // - 送信者・ルーム・本文のどれか 1 つでも空なら保存も配信もされないこと（空白のみは空ではない）
    // - 保存失敗でも配信は行われること
    // ========================================

    fn draft(sender: &str, room: &str, content: &str) -> MessageDraft {
        MessageDraft {
            sender: sender.to_string(),
            room_id: room.to_string(),
            content: content.to_string(),
        }
    }

    async fn registered(
        registry: &InMemoryConnectionRegistry,
        user: &str,
    ) -> (Connection, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(8);
        let connection = Connection::new(UserId::new(user.to_string()).unwrap(), tx);
        registry.register(connection.clone()).await;
        (connection, rx)
    }

    fn usecase(
        message_repository: Arc<dyn MessageRepository>,
        registry: Arc<InMemoryConnectionRegistry>,
    ) -> SendMessageUseCase {
        let engine = Arc::new(BroadcastEngine::new(
            registry.clone(),
            Arc::new(WebSocketMessagePusher::new()),
        ));
        SendMessageUseCase::new(
            message_repository,
            registry,
            engine,
            Arc::new(FixedClock::new(5_000)),
        )
    }

    #[tokio::test]
    async fn test_valid_message_is_saved_bound_and_broadcast() {
        // テスト項目: 有効なメッセージは保存され、送信者はルームに紐付き、自分にも配信される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let messages = Arc::new(InMemoryMessageRepository::new());
        let usecase = usecase(messages.clone(), registry.clone());
        let (alice, mut rx) = registered(&registry, "alice").await;

        // when (操作):
        let report = usecase
            .execute(&alice, draft("alice", "r1", "hi"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(report.message.timestamp, Timestamp::new(5_000));
        assert!(report.persist_error.is_none());
        assert_eq!(report.delivery.delivered, 1);
        assert_eq!(
            registry.binding_of(&alice.id).await,
            Some(RoomId::new("r1".to_string()).unwrap())
        );
        let stored = messages.list(10).await.unwrap();
        assert_eq!(stored, vec![report.message.clone()]);
        let delivered: ChatMessage = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(delivered, report.message);
    }

    #[tokio::test]
    async fn test_whitespace_only_content_is_saved_and_broadcast() {
        // テスト項目: 空白のみの本文は空ではないので、そのまま保存・配信される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let messages = Arc::new(InMemoryMessageRepository::new());
        let usecase = usecase(messages.clone(), registry.clone());
        let (alice, mut rx) = registered(&registry, "alice").await;

        // when (操作):
        let report = usecase
            .execute(&alice, draft("alice", "r1", "   "))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(report.message.content.as_str(), "   ");
        assert_eq!(report.delivery.delivered, 1);
        let stored = messages.list(10).await.unwrap();
        assert_eq!(stored, vec![report.message.clone()]);
        let delivered: ChatMessage = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_eq!(delivered.content.as_str(), "   ");
    }

    #[tokio::test]
    async fn test_invalid_message_is_never_saved_or_broadcast() {
        // テスト項目: 3 項目のうち 1 つ以上が空なら、どの組み合わせでも保存・配信されない
        // given (前提条件):
        let cases = [
            ("", "r1", "hi", ValueObjectError::UserIdEmpty),
            ("alice", "", "hi", ValueObjectError::RoomIdEmpty),
            ("alice", "r1", "", ValueObjectError::MessageContentEmpty),
            ("", "", "hi", ValueObjectError::UserIdEmpty),
            ("", "r1", "", ValueObjectError::UserIdEmpty),
            ("alice", "", "", ValueObjectError::RoomIdEmpty),
            ("", "", "", ValueObjectError::UserIdEmpty),
        ];

        for (sender, room, content, expected) in cases {
            let registry = Arc::new(InMemoryConnectionRegistry::new());
            let mut messages = MockMessageRepository::new();
            messages.expect_save().never();
            let mut pusher = MockMessagePusher::new();
            pusher.expect_push_to().never();
            let engine = Arc::new(BroadcastEngine::new(registry.clone(), Arc::new(pusher)));
            let usecase = SendMessageUseCase::new(
                Arc::new(messages),
                registry.clone(),
                engine,
                Arc::new(FixedClock::new(5_000)),
            );
            let (alice, _rx) = registered(&registry, "alice").await;
            // 既存の紐付けが変わらないことも確認する
            registry
                .bind(&alice.id, RoomId::new("r1".to_string()).unwrap())
                .await;

            // when (操作):
            let result = usecase.execute(&alice, draft(sender, room, content)).await;

            // then (期待する結果):
            assert!(
                matches!(result, Err(SendMessageError::InvalidMessage(ref e)) if *e == expected),
                "sender={sender:?} room={room:?} content={content:?}"
            );
            assert_eq!(
                registry.binding_of(&alice.id).await,
                Some(RoomId::new("r1".to_string()).unwrap())
            );
        }
    }

    #[tokio::test]
    async fn test_persist_failure_does_not_block_broadcast() {
        // テスト項目: 保存に失敗しても紐付けと配信は行われ、失敗が報告される
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut messages = MockMessageRepository::new();
        messages
            .expect_save()
            .times(1)
            .returning(|_| Err(RepositoryError::Storage("locked".to_string())));
        let usecase = usecase(Arc::new(messages), registry.clone());
        let (alice, mut rx) = registered(&registry, "alice").await;

        // when (操作):
        let report = usecase
            .execute(&alice, draft("alice", "r1", "hi"))
            .await
            .unwrap();

        // then (期待する結果):
        assert_eq!(
            report.persist_error,
            Some(RepositoryError::Storage("locked".to_string()))
        );
        assert_eq!(report.delivery.delivered, 1);
        assert!(rx.try_recv().is_ok());
    }

    #[tokio::test]
    async fn test_sending_to_another_room_moves_binding() {
        // テスト項目: 別ルームへ送ると紐付けが移り、元のルームの配信対象から外れる
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let usecase = usecase(Arc::new(InMemoryMessageRepository::new()), registry.clone());
        let (alice, _rx_alice) = registered(&registry, "alice").await;
        let r1 = RoomId::new("r1".to_string()).unwrap();
        usecase
            .execute(&alice, draft("alice", "r1", "hi"))
            .await
            .unwrap();

        // when (操作):
        usecase
            .execute(&alice, draft("alice", "r2", "moving"))
            .await
            .unwrap();

        // then (期待する結果):
        assert!(registry.subscribers(&r1).await.is_empty());
        assert_eq!(
            registry.binding_of(&alice.id).await,
            Some(RoomId::new("r2".to_string()).unwrap())
        );
    }
}
