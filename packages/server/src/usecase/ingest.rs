//! Ingest Loop
//!
//! 接続 1 本ごとの受信ループ（状態機械 `Open → {reading}* → Closed`）。
//!
//! - 開始時: Registry へ登録、オンラインを書き込む
//! - `reading`: フレームを 1 つずつ処理する
//!   - 不正なフレーム → ログを出して読み続ける
//!   - 検証エラー → 破棄して読み続ける
//!   - 有効なメッセージ → `SendMessageUseCase` に渡す
//! - ストリーム終端: Registry から外し、オフラインを書き込んで終了
//!
//! 終端の判定（Close フレーム・トランスポートエラー）は呼び出し側がストリームを
//! 終わらせることで表現する。Registry から接続を外すのはこのループだけ。

use std::{pin::pin, sync::Arc};

use futures_util::{Stream, StreamExt};

use crate::domain::{Connection, MessageDraft};

use super::{
    connect_participant::ConnectParticipantUseCase,
    disconnect_participant::DisconnectParticipantUseCase, send_message::SendMessageUseCase,
};

/// デコード済みの受信フレーム
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Message(MessageDraft),
    /// デコードできなかったフレーム（理由）
    Malformed(String),
}

/// 1 接続分の処理件数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub malformed: usize,
}

pub struct IngestLoop {
    connect: Arc<ConnectParticipantUseCase>,
    send_message: Arc<SendMessageUseCase>,
    disconnect: Arc<DisconnectParticipantUseCase>,
}

impl IngestLoop {
    pub fn new(
        connect: Arc<ConnectParticipantUseCase>,
        send_message: Arc<SendMessageUseCase>,
        disconnect: Arc<DisconnectParticipantUseCase>,
    ) -> Self {
        Self {
            connect,
            send_message,
            disconnect,
        }
    }

    /// 接続が閉じるまでフレームを処理する
    pub async fn run<S>(&self, connection: Connection, frames: S) -> IngestSummary
    where
        S: Stream<Item = InboundFrame> + Send,
    {
        let mut summary = IngestSummary::default();

        // Open
        if let Err(e) = self.connect.execute(connection.clone()).await {
            tracing::warn!(connection_id = %connection.id, "{}", e);
        }

        // reading
        let mut frames = pin!(frames);
        while let Some(frame) = frames.next().await {
            match frame {
                InboundFrame::Malformed(reason) => {
                    summary.malformed += 1;
                    tracing::warn!(
                        connection_id = %connection.id,
                        "discarding malformed frame: {}",
                        reason
                    );
                }
                InboundFrame::Message(draft) => {
                    match self.send_message.execute(&connection, draft).await {
                        Ok(report) => {
                            summary.accepted += 1;
                            tracing::debug!(
                                connection_id = %connection.id,
                                message_id = %report.message.id,
                                room_id = %report.message.room_id,
                                delivered = report.delivery.delivered,
                                "message accepted"
                            );
                        }
                        Err(e) => {
                            summary.rejected += 1;
                            tracing::debug!(connection_id = %connection.id, "message rejected: {}", e);
                        }
                    }
                }
            }
        }

        // Closed
        if let Err(e) = self.disconnect.execute(&connection).await {
            tracing::warn!(connection_id = %connection.id, "{}", e);
        }
        tracing::info!(
            connection_id = %connection.id,
            user_id = %connection.user_id,
            accepted = summary.accepted,
            rejected = summary.rejected,
            malformed = summary.malformed,
            "ingest loop closed"
        );
        summary
    }
}
