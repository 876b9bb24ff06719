//! MessagePusher trait 定義
//!
//! 接続ごとの送信キューへ 1 通を投入するインターフェース。
//! ルーム単位の配信アルゴリズムは UseCase 層の `BroadcastEngine` が持つ。

use async_trait::async_trait;

use super::{Connection, MessagePushError};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 1 つの接続へペイロードを送る
    ///
    /// 送信キューへの投入のみを行い、ソケットへの書き込み完了は待たない。
    async fn push_to(&self, connection: &Connection, payload: &str)
    -> Result<(), MessagePushError>;
}

/// ブロードキャスト 1 回分の配信結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// スナップショットに含まれていた接続数
    pub attempted: usize,
    /// 送信キューへ投入できた数
    pub delivered: usize,
    /// 投入に失敗した数（キュー満杯・切断済み）
    pub failed: usize,
}
