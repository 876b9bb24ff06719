//! Identity Gate trait
//!
//! ベアラー資格情報を検証し、認証済みのユーザー ID を返す。

use super::{AuthError, UserId};

#[cfg_attr(test, mockall::automock)]
pub trait IdentityGate: Send + Sync {
    /// 資格情報を検証してユーザー ID を取り出す
    fn verify(&self, credential: &str) -> Result<UserId, AuthError>;

    /// ユーザー向けの資格情報を発行する
    fn issue(&self, user_id: &UserId) -> Result<String, AuthError>;
}
