//! UI 層（axum ルーター、WebSocket / HTTP ハンドラ）

mod error;
mod handler;
mod server;
mod signal;
pub mod state;

pub use error::ServerError;
pub use server::{Server, build_router};
pub use state::{AppState, Collaborators};
