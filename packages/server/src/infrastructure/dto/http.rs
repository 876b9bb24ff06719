//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

/// Default number of messages returned by the history endpoints.
pub const DEFAULT_HISTORY_LIMIT: usize = 50;
/// Upper bound accepted for the `limit` query parameter.
pub const MAX_HISTORY_LIMIT: usize = 200;

/// Query parameters of the history endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<String>,
}

impl HistoryQuery {
    /// Resolve the effective limit.
    ///
    /// Unparsable values or values outside `1..=200` fall back to the default.
    pub fn effective_limit(&self) -> usize {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|n| (1..=MAX_HISTORY_LIMIT).contains(n))
            .unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}

/// Presence record response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceDto {
    pub user_id: String,
    pub online: bool,
    /// Unix timestamp in milliseconds
    pub last_seen: i64,
    /// `last_seen` in RFC 3339 (UTC)
    pub last_seen_at: String,
}

/// Room response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomDto {
    pub id: String,
    pub name: String,
    pub members: Vec<String>,
}

/// Request body of `POST /api/rooms`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CreateRoomRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>) -> HistoryQuery {
        HistoryQuery {
            limit: limit.map(str::to_string),
        }
    }

    #[test]
    fn test_effective_limit_defaults() {
        // テスト項目: limit 未指定・範囲外・不正値は既定値 50 になる
        // given (前提条件):
        let cases = [None, Some("0"), Some("201"), Some("-3"), Some("abc")];

        for limit in cases {
            // when (操作):
            let result = query(limit).effective_limit();

            // then (期待する結果):
            assert_eq!(result, DEFAULT_HISTORY_LIMIT, "limit = {:?}", limit);
        }
    }

    #[test]
    fn test_effective_limit_accepts_range() {
        // テスト項目: 1..=200 の値はそのまま使われる
        // given (前提条件):

        // when (操作):

        // then (期待する結果):
        assert_eq!(query(Some("1")).effective_limit(), 1);
        assert_eq!(query(Some("200")).effective_limit(), 200);
        assert_eq!(query(Some(" 75 ")).effective_limit(), 75);
    }
}
