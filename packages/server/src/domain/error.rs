//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクトの生成エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("user id must not be empty")]
    UserIdEmpty,

    #[error("room id must not be empty")]
    RoomIdEmpty,

    #[error("message content must not be empty")]
    MessageContentEmpty,

    #[error("invalid message id: '{0}'")]
    MessageIdInvalid(String),
}

/// 永続化コラボレータのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("room '{0}' already exists")]
    RoomAlreadyExists(String),

    #[error("presence for '{0}' not found")]
    PresenceNotFound(String),

    #[error("storage error: {0}")]
    Storage(String),
}

/// 接続へのメッセージ送信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("outbound queue of connection '{0}' is full")]
    QueueFull(String),

    #[error("connection '{0}' is closed")]
    ConnectionClosed(String),
}

/// Identity Gate の認証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("missing credential")]
    MissingCredential,

    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    #[error("credential expired")]
    Expired,

    #[error("failed to issue credential: {0}")]
    IssueFailed(String),
}
