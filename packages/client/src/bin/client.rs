//! Interactive chat client for the Tsudoi hub.
//!
//! Sends each typed line to the current room and prints messages delivered
//! to that room. `/room <id>` switches rooms. Automatically reconnects on
//! disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin tsudoi-server -- --issue-token alice
//! cargo run --bin tsudoi-client -- --user alice --token <TOKEN> --room lobby
//! ```

use clap::Parser;
use tsudoi_client::{SessionConfig, run_client};
use tsudoi_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "tsudoi-client")]
#[command(about = "Interactive chat client for the Tsudoi hub", long_about = None)]
struct Args {
    /// WebSocket server URL
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:9090/ws")]
    url: String,

    /// Access token (see `tsudoi-server --issue-token`)
    #[arg(short = 't', long, env = "TSUDOI_TOKEN", hide_env_values = true)]
    token: String,

    /// User ID sent with each message
    #[arg(short = 'n', long)]
    user: String,

    /// Room to send to initially
    #[arg(short = 'r', long, default_value = "lobby")]
    room: String,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // Initialize tracing
    setup_logger(&["tsudoi_client"], "info");

    let config = SessionConfig {
        url: args.url,
        token: args.token,
        user: args.user,
    };
    if let Err(e) = run_client(config, args.room).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
