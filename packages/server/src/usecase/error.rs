//! UseCase 層のエラー型

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// プレゼンス書き込みの失敗
///
/// 呼び出し元へ報告されるが、接続ライフサイクルは止めない。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to write presence for '{user_id}': {source}")]
pub struct PresenceError {
    pub user_id: String,
    #[source]
    pub source: RepositoryError,
}

/// メッセージ送信の失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendMessageError {
    /// 送信者・ルーム・本文のいずれかが空
    #[error("invalid message: {0}")]
    InvalidMessage(#[from] ValueObjectError),
}

/// プレゼンス参照の失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GetPresenceError {
    #[error("presence for '{0}' not found")]
    NotFound(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// ルーム操作の失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomUseCaseError {
    #[error("room name must not be empty")]
    InvalidName,

    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValueObjectError),

    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for RoomUseCaseError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(id) => Self::RoomNotFound(id),
            other => Self::Repository(other),
        }
    }
}
