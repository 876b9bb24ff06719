//! In-process test server shared by the integration tests.

#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use tokio::{net::TcpStream, task::JoinHandle};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{Message, client::IntoClientRequest, http::HeaderValue},
};
use tsudoi_server::{
    domain::{IdentityGate, UserId},
    infrastructure::{
        auth::JwtIdentityGate,
        repository::{InMemoryMessageRepository, InMemoryPresenceRepository, InMemoryRoomRepository},
    },
    ui::{AppState, Collaborators, build_router},
};
use tsudoi_shared::time::SystemClock;

pub const SECRET: &[u8] = b"integration-test-secret";

pub type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestServer {
    pub addr: String,
    pub state: Arc<AppState>,
    gate: JwtIdentityGate,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server with in-memory storage on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(AppState::new(Collaborators {
            messages: Arc::new(InMemoryMessageRepository::new()),
            presence: Arc::new(InMemoryPresenceRepository::new()),
            rooms: Arc::new(InMemoryRoomRepository::new()),
            identity_gate: Arc::new(JwtIdentityGate::new(SECRET, Duration::from_secs(3600))),
            clock: Arc::new(SystemClock),
            outbound_queue_capacity: 64,
        }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("No local addr").to_string();
        let router = build_router(state.clone());
        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server failed");
        });

        Self {
            addr,
            state,
            gate: JwtIdentityGate::new(SECRET, Duration::from_secs(3600)),
            handle,
        }
    }

    pub fn token(&self, user: &str) -> String {
        self.gate
            .issue(&UserId::new(user.to_string()).expect("Invalid user"))
            .expect("Failed to issue token")
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Open an authenticated WebSocket connection for `user`.
    pub async fn connect(&self, user: &str) -> Socket {
        let mut request = self.ws_url().into_client_request().expect("Invalid request");
        let bearer = format!("Bearer {}", self.token(user));
        request.headers_mut().insert(
            "Authorization",
            HeaderValue::from_str(&bearer).expect("Invalid header"),
        );
        let (socket, _) = connect_async(request).await.expect("Failed to connect");
        socket
    }

    /// Wait until the registry holds `expected` connections.
    pub async fn wait_for_connections(&self, expected: usize) {
        for _ in 0..200 {
            if self.state.registry.len().await == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "expected {} connections, found {}",
            expected,
            self.state.registry.len().await
        );
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub async fn send_chat(socket: &mut Socket, user: &str, room: &str, content: &str) {
    let frame = serde_json::json!({"user_id": user, "room_id": room, "content": content});
    socket
        .send(Message::Text(frame.to_string().into()))
        .await
        .expect("Failed to send");
}

/// Next text message as JSON, skipping control frames.
pub async fn next_json(socket: &mut Socket) -> serde_json::Value {
    let deadline = Duration::from_secs(5);
    loop {
        let message = tokio::time::timeout(deadline, socket.next())
            .await
            .expect("Timed out waiting for a message")
            .expect("Stream ended")
            .expect("Socket error");
        if let Message::Text(text) = message {
            return serde_json::from_str(text.as_str()).expect("Invalid JSON");
        }
    }
}

/// Assert that nothing arrives within a short window.
pub async fn assert_silent(socket: &mut Socket) {
    let result = tokio::time::timeout(Duration::from_millis(200), socket.next()).await;
    assert!(result.is_err(), "unexpected message: {:?}", result);
}
