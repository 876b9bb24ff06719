//! Bearer token extractor.
//!
//! `Authorization: Bearer <token>` を優先し、ブラウザの WebSocket 向けに
//! `?token=<token>` クエリも受け付ける。検証に失敗したら 401 を返す。

use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, Query},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION, request::Parts},
};
use serde::Deserialize;

use crate::{domain::UserId, ui::state::AppState};

/// 認証済みのユーザー
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserId);

#[derive(Debug, Default, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = StatusCode;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let credential = bearer_token(&parts.headers)
            .or_else(|| {
                Query::<TokenQuery>::try_from_uri(&parts.uri)
                    .ok()
                    .and_then(|Query(query)| query.token)
            })
            .unwrap_or_default();

        match state.identity_gate.verify(&credential) {
            Ok(user_id) => Ok(Self(user_id)),
            Err(e) => {
                tracing::warn!(path = %parts.uri.path(), "rejected request: {}", e);
                Err(StatusCode::UNAUTHORIZED)
            }
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    scheme
        .eq_ignore_ascii_case("bearer")
        .then(|| token.trim().to_string())
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_bearer_token_parsing() {
        // テスト項目: Bearer スキームのみを受け付け、前後の空白は除く
        // given (前提条件):
        let cases = [
            ("Bearer abc.def", Some("abc.def")),
            ("bearer  abc ", Some("abc")),
            ("Basic dXNlcg==", None),
            ("Bearer", None),
        ];

        for (header, expected) in cases {
            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, HeaderValue::from_static(header));

            // when (操作):
            let token = bearer_token(&headers);

            // then (期待する結果):
            assert_eq!(token.as_deref(), expected, "header = {:?}", header);
        }
    }

    #[test]
    fn test_missing_header() {
        // テスト項目: ヘッダーがなければ None
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
