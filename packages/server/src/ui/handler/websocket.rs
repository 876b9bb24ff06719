//! WebSocket connection handlers.
//!
//! Authentication happens before the upgrade; a rejected caller gets 401 and never
//! reaches the registry. After the upgrade each socket gets a bounded outbound queue,
//! a writer task and an ingest loop.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{
    future,
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use tokio::sync::mpsc;

use crate::{
    domain::{Connection, MessageDraft, UserId},
    infrastructure::dto::websocket::decode_inbound,
    ui::state::AppState,
    usecase::InboundFrame,
};

use super::AuthenticatedUser;

pub async fn websocket_handler(
    AuthenticatedUser(user_id): AuthenticatedUser,
    State(state): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    tracing::info!(user_id = %user_id, "upgrading connection");
    ws.on_upgrade(move |socket| handle_socket(socket, state, user_id))
}

/// Spawns the writer task that drains this connection's outbound queue into the socket.
///
/// The task ends when the queue is closed or the socket rejects a write.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if let Err(e) = sender.send(Message::Text(payload.into())).await {
                tracing::debug!("socket write failed: {}", e);
                break;
            }
        }
        let _ = sender.close().await;
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>, user_id: UserId) {
    let (sender, receiver) = socket.split();

    let (tx, rx) = mpsc::channel(state.outbound_queue_capacity);
    let connection = Connection::new(user_id, tx);
    let connection_id = connection.id;
    let writer = pusher_loop(rx, sender);

    // A Close frame or a transport error ends the stream
    let frames = receiver
        .take_while(move |result| {
            let open = match result {
                Ok(Message::Close(_)) => false,
                Ok(_) => true,
                Err(e) => {
                    tracing::debug!(connection_id = %connection_id, "socket read failed: {}", e);
                    false
                }
            };
            future::ready(open)
        })
        .filter_map(|result| future::ready(result.ok().and_then(classify)));

    state.ingest_loop.run(connection, frames).await;
    writer.abort();
}

/// Map one WebSocket message to an inbound frame. Control frames yield `None`.
fn classify(message: Message) -> Option<InboundFrame> {
    match message {
        Message::Text(text) => Some(decode(text.as_str())),
        Message::Binary(bytes) => Some(match std::str::from_utf8(&bytes) {
            Ok(text) => decode(text),
            Err(e) => InboundFrame::Malformed(format!("binary frame is not UTF-8: {}", e)),
        }),
        Message::Ping(_) | Message::Pong(_) | Message::Close(_) => None,
    }
}

fn decode(text: &str) -> InboundFrame {
    match decode_inbound(text) {
        Ok(inbound) => InboundFrame::Message(MessageDraft::from(inbound)),
        Err(e) => InboundFrame::Malformed(e.to_string()),
    }
}
