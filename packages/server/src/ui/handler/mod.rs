//! HTTP / WebSocket handlers.

mod auth;
mod http;
mod websocket;

pub use auth::AuthenticatedUser;
pub use http::{
    create_room, get_history, get_online_presence, get_presence, get_room_detail,
    get_room_history, get_rooms, health_check, join_room, leave_room,
};
pub use websocket::websocket_handler;
