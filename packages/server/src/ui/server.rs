//! Server execution logic.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    error::ServerError,
    handler::{
        create_room, get_history, get_online_presence, get_presence, get_room_detail,
        get_room_history, get_rooms, health_check, join_room, leave_room, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Build the router with every endpoint and request tracing.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/history", get(get_history))
        .route("/api/presence/online", get(get_online_presence))
        .route("/api/presence/{user_id}", get(get_presence))
        .route("/api/rooms", get(get_rooms).post(create_room))
        .route("/api/rooms/{room_id}", get(get_room_detail))
        .route("/api/rooms/{room_id}/history", get(get_room_history))
        .route("/api/rooms/{room_id}/join", post(join_room))
        .route("/api/rooms/{room_id}/leave", post(leave_room))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Tsudoi chat hub server
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Bind to `host:port` and serve until Ctrl+C / SIGTERM.
    pub async fn run(self, host: &str, port: u16) -> Result<(), ServerError> {
        let addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: addr.clone(),
                source,
            })?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener until Ctrl+C / SIGTERM.
    pub async fn serve(self, listener: TcpListener) -> Result<(), ServerError> {
        let local_addr = listener.local_addr().map_err(ServerError::Serve)?;
        tracing::info!("Tsudoi chat hub listening on {}", local_addr);
        tracing::info!("Connect to: ws://{}/ws", local_addr);

        axum::serve(listener, build_router(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(ServerError::Serve)?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}
