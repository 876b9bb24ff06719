//! JWT（HS256）を使った Identity Gate 実装
//!
//! クレームは `sub`（ユーザー ID）と `exp`（有効期限、Unix 秒）のみを使う。

use std::time::Duration;

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use tsudoi_shared::time::{Clock, SystemClock};

use crate::domain::{AuthError, IdentityGate, UserId};

/// 既定のトークン有効期間（24 時間）
pub const DEFAULT_TOKEN_EXPIRY: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// JWT Identity Gate
pub struct JwtIdentityGate {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
    clock: Box<dyn Clock>,
}

impl JwtIdentityGate {
    pub fn new(secret: &[u8], expiry: Duration) -> Self {
        Self::with_clock(secret, expiry, Box::new(SystemClock))
    }

    pub fn with_clock(secret: &[u8], expiry: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry,
            clock,
        }
    }
}

impl IdentityGate for JwtIdentityGate {
    fn verify(&self, credential: &str) -> Result<UserId, AuthError> {
        let credential = credential.trim();
        if credential.is_empty() {
            return Err(AuthError::MissingCredential);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        let token_data = decode::<Claims>(credential, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::InvalidCredential(e.to_string()),
            })?;

        UserId::new(token_data.claims.sub)
            .map_err(|e| AuthError::InvalidCredential(e.to_string()))
    }

    fn issue(&self, user_id: &UserId) -> Result<String, AuthError> {
        let now_secs = self.clock.now_millis() / 1000;
        let expiry_secs = i64::try_from(self.expiry.as_secs()).unwrap_or(i64::MAX);
        let claims = Claims {
            sub: user_id.as_str().to_string(),
            exp: now_secs.saturating_add(expiry_secs),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::IssueFailed(e.to_string()))
    }
}
