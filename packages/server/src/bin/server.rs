//! Tsudoi chat hub server.
//!
//! Accepts authenticated WebSocket connections, routes each valid message to
//! the connections currently bound to its room, and tracks presence.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsudoi-server
//! cargo run --bin tsudoi-server -- --port 3000 --in-memory
//! cargo run --bin tsudoi-server -- --issue-token alice
//! ```

use std::sync::Arc;

use clap::Parser;
use tsudoi_server::{
    config::ServerConfig,
    domain::{
        AuthError, IdentityGate, MessageRepository, PresenceRepository, RoomRepository, UserId,
    },
    infrastructure::{
        auth::JwtIdentityGate,
        repository::{
            InMemoryMessageRepository, InMemoryPresenceRepository, InMemoryRoomRepository,
            SqliteStore,
        },
    },
    ui::{AppState, Collaborators, Server, ServerError},
};
use tsudoi_shared::{logger::setup_logger, time::SystemClock};

#[tokio::main]
async fn main() {
    let config = ServerConfig::parse();

    // Initialize tracing
    setup_logger(&["tsudoi_server", "tower_http"], &config.log_level);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: ServerConfig) -> Result<(), ServerError> {
    // 1. Identity Gate
    if config.uses_default_secret() {
        tracing::warn!("Using the default JWT secret; set WS_JWT_SECRET in production");
    }
    let identity_gate = Arc::new(JwtIdentityGate::new(
        config.jwt_secret.as_bytes(),
        config.token_expiry(),
    ));

    if let Some(user) = &config.issue_token {
        let user_id = UserId::new(user.clone())
            .map_err(|e| AuthError::IssueFailed(e.to_string()))?;
        println!("{}", identity_gate.issue(&user_id)?);
        return Ok(());
    }

    // 2. Repositories
    let (messages, presence, rooms): (
        Arc<dyn MessageRepository>,
        Arc<dyn PresenceRepository>,
        Arc<dyn RoomRepository>,
    ) = if config.in_memory {
        tracing::info!("Using in-memory storage");
        (
            Arc::new(InMemoryMessageRepository::new()),
            Arc::new(InMemoryPresenceRepository::new()),
            Arc::new(InMemoryRoomRepository::new()),
        )
    } else {
        let store = SqliteStore::open(&config.database)?;
        (
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store),
        )
    };

    // 3. UseCases / AppState
    let state = Arc::new(AppState::new(Collaborators {
        messages,
        presence,
        rooms,
        identity_gate,
        clock: Arc::new(SystemClock),
        outbound_queue_capacity: config.outbound_queue,
    }));

    // 4. Run the server
    Server::new(state).run(&config.host, config.port).await
}
