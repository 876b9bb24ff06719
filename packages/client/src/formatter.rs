//! Message formatting utilities for client display.

use tsudoi_server::infrastructure::dto::websocket::OutboundMessage;
use tsudoi_shared::time::timestamp_to_rfc3339;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Banner shown after each successful connection
    pub fn format_welcome(user: &str, room: &str) -> String {
        format!(
            "\nYou are '{}' in room '{}'. Type messages and press Enter to send.\n\
             Use /room <id> to switch rooms. Press Ctrl+C to exit.\n\n",
            user, room
        )
    }

    /// Format a chat message received from the server
    ///
    /// The sender is marked with "(me)" when it is the current user.
    pub fn format_chat_message(message: &OutboundMessage, current_user: &str) -> String {
        let me_suffix = if message.user_id == current_user {
            " (me)"
        } else {
            ""
        };
        format!(
            "\n\n------------------------------------------------------------\n\
             [{}] @{}{}: {}\n\
             sent at {}\n\
             ------------------------------------------------------------\n",
            message.room_id,
            message.user_id,
            me_suffix,
            message.content,
            timestamp_to_rfc3339(message.timestamp)
        )
    }

    /// Format the notice shown after `/room <id>`
    pub fn format_room_switched(room: &str) -> String {
        format!("\n* now sending to room '{}'\n", room)
    }

    /// Format the usage hint for `/room` without an id
    pub fn format_room_usage() -> String {
        "\n* usage: /room <id>\n".to_string()
    }

    /// Format a binary message notification
    pub fn format_binary_message(byte_count: usize) -> String {
        format!("\n← Received {} bytes of binary data\n", byte_count)
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(user: &str) -> OutboundMessage {
        OutboundMessage {
            id: "6f1c2c7e-2f43-4a55-9d0a-1f0a7c1f2b3d".to_string(),
            user_id: user.to_string(),
            room_id: "lobby".to_string(),
            content: "Hello, world!".to_string(),
            timestamp: 1672531200000,
        }
    }

    #[test]
    fn test_format_chat_message() {
        // テスト項目: チャットメッセージがルーム・送信者・RFC 3339 時刻付きで表示される
        // given (前提条件):
        let msg = message("bob");

        // when (操作):
        let result = MessageFormatter::format_chat_message(&msg, "alice");

        // then (期待する結果):
        assert!(result.contains("[lobby] @bob: Hello, world!"));
        assert!(result.contains("sent at 2023-01-01T00:00:00.000Z"));
        assert!(!result.contains("(me)"));
    }

    #[test]
    fn test_format_own_chat_message() {
        // テスト項目: 自分のメッセージには (me) が付く
        // given (前提条件):
        let msg = message("alice");

        // when (操作):
        let result = MessageFormatter::format_chat_message(&msg, "alice");

        // then (期待する結果):
        assert!(result.contains("@alice (me): Hello, world!"));
    }

    #[test]
    fn test_format_welcome_and_room_switch() {
        // テスト項目: 接続時の案内とルーム切り替え通知
        // given (前提条件):
        let user = "alice";
        let room = "general";

        // when (操作):
        let welcome = MessageFormatter::format_welcome(user, room);
        let switched = MessageFormatter::format_room_switched(room);

        // then (期待する結果):
        assert!(welcome.contains("You are 'alice' in room 'general'"));
        assert!(welcome.contains("/room <id>"));
        assert!(switched.contains("room 'general'"));
    }

    #[test]
    fn test_format_binary_message() {
        // テスト項目: バイナリメッセージ通知が正しくフォーマットされる
        // given (前提条件):
        let byte_count = 1024;

        // when (操作):
        let result = MessageFormatter::format_binary_message(byte_count);

        // then (期待する結果):
        assert!(result.contains("1024 bytes"));
        assert!(result.contains("Received"));
    }

    #[test]
    fn test_format_raw_message() {
        // テスト項目: 生メッセージが正しくフォーマットされる
        // given (前提条件):
        let text = "unknown message format";

        // when (操作):
        let result = MessageFormatter::format_raw_message(text);

        // then (期待する結果):
        assert!(result.contains("unknown message format"));
        assert!(result.contains("Received:"));
    }
}
