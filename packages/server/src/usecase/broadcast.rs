//! Broadcast Engine
//!
//! ## 概要
//!
//! 検証済みメッセージのルーム購読者スナップショットを Registry から取り、
//! 正規のシリアライズ形式を 1 度だけ作って各接続へ個別に投入する。
//!
//! - 1 接続への失敗は他の接続への配信を止めない
//! - 失敗しても接続の登録解除はしない（登録解除は Ingest Loop の責務）
//! - 再送しない、送信者へ失敗を返さない

use std::sync::Arc;

use crate::domain::{ChatMessage, ConnectionRegistry, DeliveryReport, MessagePusher};

/// ルーム単位のブロードキャスト
pub struct BroadcastEngine {
    registry: Arc<dyn ConnectionRegistry>,
    message_pusher: Arc<dyn MessagePusher>,
}

impl BroadcastEngine {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            registry,
            message_pusher,
        }
    }

    /// メッセージのルームの現在の購読者全員へ配信する
    pub async fn broadcast(&self, message: &ChatMessage) -> DeliveryReport {
        let payload = match serde_json::to_string(message) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::error!(message_id = %message.id, "failed to serialize message: {}", e);
                return DeliveryReport::default();
            }
        };

        let targets = self.registry.subscribers(&message.room_id).await;
        let mut report = DeliveryReport {
            attempted: targets.len(),
            ..DeliveryReport::default()
        };

        for target in &targets {
            match self.message_pusher.push_to(target, &payload).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        connection_id = %target.id,
                        user_id = %target.user_id,
                        room_id = %message.room_id,
                        "delivery failed: {}",
                        e
                    );
                }
            }
        }

        tracing::debug!(
            room_id = %message.room_id,
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            "broadcast finished"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use tokio::sync::mpsc;

    use super::*;
    use crate::{
        domain::{
            Connection, MessageDraft, MessagePushError, RoomId, Timestamp, UserId,
            message_pusher::MockMessagePusher,
        },
        infrastructure::{
            message_pusher::WebSocketMessagePusher, registry::InMemoryConnectionRegistry,
        },
    };

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - N 人の購読者へ N 通、同一バイト列で配信されること
    // - 他ルーム・紐付けなしの接続には配信されないこと
    // - 1 接続の失敗が他の接続への配信や Registry に影響しないこと
    // ========================================

    fn message(room: &str, content: &str) -> ChatMessage {
        ChatMessage::accept(
            MessageDraft {
                sender: "alice".to_string(),
                room_id: room.to_string(),
                content: content.to_string(),
            },
            Timestamp::new(1_000),
        )
        .unwrap()
    }

    async fn join(
        registry: &InMemoryConnectionRegistry,
        user: &str,
        room: Option<&str>,
        capacity: usize,
    ) -> (Connection, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        let connection = Connection::new(UserId::new(user.to_string()).unwrap(), tx);
        registry.register(connection.clone()).await;
        if let Some(room) = room {
            registry
                .bind(&connection.id, RoomId::new(room.to_string()).unwrap())
                .await;
        }
        (connection, rx)
    }

    #[tokio::test]
    async fn test_broadcast_delivers_identical_copy_to_each_subscriber() {
        // テスト項目: ルームの購読者 N 人に同一の正規形式が N 通届く
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let (_a, mut rx_a) = join(&registry, "alice", Some("r1"), 8).await;
        let (_b, mut rx_b) = join(&registry, "bob", Some("r1"), 8).await;
        let (_c, mut rx_c) = join(&registry, "carol", Some("r2"), 8).await;
        let (_d, mut rx_d) = join(&registry, "dave", None, 8).await;
        let engine = BroadcastEngine::new(registry.clone(), Arc::new(WebSocketMessagePusher::new()));
        let msg = message("r1", "hi");
        let canonical = serde_json::to_string(&msg).unwrap();

        // when (操作):
        let report = engine.broadcast(&msg).await;

        // then (期待する結果):
        assert_eq!(
            report,
            DeliveryReport {
                attempted: 2,
                delivered: 2,
                failed: 0
            }
        );
        assert_eq!(rx_a.try_recv().unwrap(), canonical);
        assert_eq!(rx_b.try_recv().unwrap(), canonical);
        assert!(rx_c.try_recv().is_err());
        assert!(rx_d.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_broadcast_isolates_failed_recipients() {
        // テスト項目: 切断済み・満杯の接続があっても他の購読者には届き、Registry は変わらない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let (closed, rx_closed) = join(&registry, "closed", Some("r1"), 8).await;
        drop(rx_closed);
        let (full, _rx_full) = join(&registry, "full", Some("r1"), 1).await;
        full.sender().try_send("backlog".to_string()).unwrap();
        let (_ok, mut rx_ok) = join(&registry, "ok", Some("r1"), 8).await;
        let engine = BroadcastEngine::new(registry.clone(), Arc::new(WebSocketMessagePusher::new()));

        // when (操作):
        let report = engine.broadcast(&message("r1", "hi")).await;

        // then (期待する結果):
        assert_eq!(report.attempted, 3);
        assert_eq!(report.delivered, 1);
        assert_eq!(report.failed, 2);
        assert!(rx_ok.try_recv().is_ok());
        assert_eq!(registry.len().await, 3);
        assert_eq!(
            registry
                .binding_of(&closed.id)
                .await
                .map(|r| r.into_string()),
            Some("r1".to_string())
        );
    }

    #[tokio::test]
    async fn test_broadcast_attempts_every_target_even_when_pusher_fails() {
        // テスト項目: Pusher が途中で失敗しても全ての購読者への送信が試みられる
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let mut expected_users = Vec::new();
        for user in ["u1", "u2", "u3", "u4"] {
            join(&registry, user, Some("r1"), 8).await;
            expected_users.push(user.to_string());
        }
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let seen_in_mock = seen.clone();
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_push_to()
            .times(4)
            .returning(move |connection, _payload| {
                let user = connection.user_id.as_str().to_string();
                seen_in_mock.lock().unwrap().push(user.clone());
                if user == "u2" {
                    Err(MessagePushError::ConnectionClosed(user))
                } else {
                    Ok(())
                }
            });
        let engine = BroadcastEngine::new(registry, Arc::new(pusher));

        // when (操作):
        let report = engine.broadcast(&message("r1", "hi")).await;

        // then (期待する結果):
        assert_eq!(report.delivered, 3);
        assert_eq!(report.failed, 1);
        let mut seen = seen.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, expected_users);
    }

    #[tokio::test]
    async fn test_broadcast_to_empty_room() {
        // テスト項目: 購読者がいないルームへの配信は何もしない
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let engine = BroadcastEngine::new(registry, Arc::new(WebSocketMessagePusher::new()));

        // when (操作):
        let report = engine.broadcast(&message("empty", "hi")).await;

        // then (期待する結果):
        assert_eq!(report, DeliveryReport::default());
    }

    #[tokio::test]
    async fn test_broadcast_preserves_submission_order_per_room() {
        // テスト項目: 同じルームへの連続した配信は投入順に届く
        // given (前提条件):
        let registry = Arc::new(InMemoryConnectionRegistry::new());
        let (_a, mut rx_a) = join(&registry, "alice", Some("r1"), 16).await;
        let engine = BroadcastEngine::new(registry, Arc::new(WebSocketMessagePusher::new()));

        // when (操作):
        for i in 0..5 {
            engine.broadcast(&message("r1", &format!("m{i}"))).await;
        }

        // then (期待する結果):
        for i in 0..5 {
            let payload = rx_a.try_recv().unwrap();
            let received: ChatMessage = serde_json::from_str(&payload).unwrap();
            assert_eq!(received.content.as_str(), format!("m{i}"));
        }
    }
}
