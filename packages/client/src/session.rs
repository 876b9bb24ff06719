//! WebSocket client session management.

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{
    connect_async,
    tungstenite::{
        Error as WsError,
        client::IntoClientRequest,
        http::{HeaderValue, StatusCode, header::AUTHORIZATION},
        protocol::Message,
    },
};
use tsudoi_server::infrastructure::dto::websocket::{InboundMessage, OutboundMessage};

use crate::error::ClientError;

use super::{
    domain::{Input, parse_input},
    formatter::MessageFormatter,
    ui::redisplay_prompt,
};

/// Connection settings for one client
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub url: String,
    pub token: String,
    pub user: String,
}

/// Run one WebSocket session until the user quits or the connection drops.
///
/// `room` is the current target room; `/room <id>` updates it so that the
/// choice survives a reconnect. Input lines come from the readline thread.
pub async fn run_client_session(
    config: &SessionConfig,
    room: &mut String,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let mut request = config
        .url
        .as_str()
        .into_client_request()
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    let bearer = HeaderValue::from_str(&format!("Bearer {}", config.token))
        .map_err(|e| ClientError::ConnectionError(e.to_string()))?;
    request.headers_mut().insert(AUTHORIZATION, bearer);

    let (ws_stream, _response) = match connect_async(request).await {
        Ok(result) => result,
        Err(WsError::Http(response)) if response.status() == StatusCode::UNAUTHORIZED => {
            return Err(ClientError::Unauthorized);
        }
        Err(e) => return Err(ClientError::ConnectionError(e.to_string())),
    };

    tracing::info!("Connected to chat server!");
    print!("{}", MessageFormatter::format_welcome(&config.user, room));
    redisplay_prompt(&config.user);

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to handle incoming messages
    let user_for_read = config.user.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    let formatted = match serde_json::from_str::<OutboundMessage>(text.as_str()) {
                        Ok(chat) => MessageFormatter::format_chat_message(&chat, &user_for_read),
                        Err(_) => MessageFormatter::format_raw_message(text.as_str()),
                    };
                    print!("{}", formatted);
                    redisplay_prompt(&user_for_read);
                }
                Ok(Message::Binary(data)) => {
                    print!("{}", MessageFormatter::format_binary_message(data.len()));
                    redisplay_prompt(&user_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Forward typed lines to the server until the user quits
    let write_loop = async {
        while let Some(line) = input_rx.recv().await {
            match parse_input(&line) {
                Input::SwitchRoom(next) => {
                    *room = next;
                    print!("{}", MessageFormatter::format_room_switched(room));
                }
                Input::MissingRoom => print!("{}", MessageFormatter::format_room_usage()),
                Input::Chat(content) => {
                    let frame = InboundMessage {
                        user_id: config.user.clone(),
                        room_id: room.clone(),
                        content,
                    };
                    let json = match serde_json::to_string(&frame) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!("Failed to serialize message: {}", e);
                            continue;
                        }
                    };
                    if let Err(e) = write.send(Message::Text(json.into())).await {
                        return Err(ClientError::ConnectionError(e.to_string()));
                    }
                    continue;
                }
            }
            redisplay_prompt(&config.user);
        }
        let _ = write.close().await;
        Ok(())
    };

    tokio::select! {
        _ = &mut read_task => Err(ClientError::ConnectionError("Connection lost".to_string())),
        result = write_loop => {
            read_task.abort();
            result
        }
    }
}
