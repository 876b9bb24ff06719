//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの有界キュー（`PusherChannel`）へのペイロード投入
//!
//! ## 設計ノート
//!
//! キューの生成とソケットへの書き出しは UI 層（`ui/handler/websocket.rs`）で行う。
//! この実装は `try_send` のみを使い、受信側が詰まっていても待たない。
//! キューが満杯ならその 1 通を破棄し、切断済みなら失敗として返す。

use async_trait::async_trait;
use tokio::sync::mpsc::error::TrySendError;

use crate::domain::{Connection, MessagePushError, MessagePusher};

/// 既定の送信キュー容量
pub const DEFAULT_OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// WebSocket を使った MessagePusher 実装
#[derive(Debug, Default, Clone, Copy)]
pub struct WebSocketMessagePusher;

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn push_to(
        &self,
        connection: &Connection,
        payload: &str,
    ) -> Result<(), MessagePushError> {
        match connection.sender().try_send(payload.to_string()) {
            Ok(()) => {
                tracing::debug!(connection_id = %connection.id, "queued message for connection");
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                Err(MessagePushError::QueueFull(connection.id.to_string()))
            }
            Err(TrySendError::Closed(_)) => {
                Err(MessagePushError::ConnectionClosed(connection.id.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use tokio::sync::mpsc;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - push_to が送信キューへ投入すること
    // - キュー満杯・切断済みがそれぞれのエラーになること
    //
    // 【なぜこのテストが必要か】
    // - 遅い受信者がいても送信側が待たされないことを保証する
    // ========================================

    fn connection_with_capacity(capacity: usize) -> (Connection, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        let connection = Connection::new(UserId::new("alice".to_string()).unwrap(), tx);
        (connection, rx)
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 接続の送信キューにメッセージが投入される
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (connection, mut rx) = connection_with_capacity(4);

        // when (操作):
        let result = pusher.push_to(&connection, "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx.recv().await, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_full_queue_drops_message() {
        // テスト項目: キューが満杯なら待たずに QueueFull を返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (connection, mut rx) = connection_with_capacity(1);
        pusher.push_to(&connection, "first").await.unwrap();

        // when (操作):
        let result = pusher.push_to(&connection, "second").await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::QueueFull(_))));
        assert_eq!(rx.recv().await, Some("first".to_string()));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_push_to_closed_connection() {
        // テスト項目: 受信側が閉じた接続への送信は ConnectionClosed を返す
        // given (前提条件):
        let pusher = WebSocketMessagePusher::new();
        let (connection, rx) = connection_with_capacity(4);
        drop(rx);

        // when (操作):
        let result = pusher.push_to(&connection, "Hello").await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ConnectionClosed(_))));
    }
}
