//! Server configuration (command-line flags with environment fallbacks).

use std::time::Duration;

use clap::Parser;

use crate::infrastructure::message_pusher::websocket::DEFAULT_OUTBOUND_QUEUE_CAPACITY;

/// Secret used when none is configured. Only suitable for local development.
pub const DEFAULT_JWT_SECRET: &str = "changeme";

#[derive(Parser, Debug, Clone)]
#[command(name = "tsudoi-server")]
#[command(about = "Room-scoped real-time chat hub over WebSocket", long_about = None)]
pub struct ServerConfig {
    /// Host address to bind the server to
    #[arg(short = 'H', long, env = "WS_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, env = "WS_PORT", default_value_t = 9090)]
    pub port: u16,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, env = "WS_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// SQLite database file
    #[arg(long, env = "WS_DB_PATH", default_value = "tsudoi.db")]
    pub database: String,

    /// Keep messages, presence and rooms in memory instead of SQLite
    #[arg(long)]
    pub in_memory: bool,

    /// HS256 secret for access tokens
    #[arg(long, env = "WS_JWT_SECRET", default_value = DEFAULT_JWT_SECRET, hide_env_values = true)]
    pub jwt_secret: String,

    /// Lifetime of issued tokens in seconds
    #[arg(long, default_value_t = 86_400)]
    pub token_expiry_secs: u64,

    /// Capacity of each connection's outbound queue
    #[arg(long, default_value_t = DEFAULT_OUTBOUND_QUEUE_CAPACITY, value_parser = parse_capacity)]
    pub outbound_queue: usize,

    /// Print an access token for USER and exit
    #[arg(long, value_name = "USER")]
    pub issue_token: Option<String>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn token_expiry(&self) -> Duration {
        Duration::from_secs(self.token_expiry_secs)
    }

    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

fn parse_capacity(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("capacity must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}
