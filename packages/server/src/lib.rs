//! Room-scoped real-time chat hub.
//!
//! This library provides the live connection hub (connection registry,
//! room-scoped broadcast and presence tracking), its persistence
//! collaborators and the HTTP/WebSocket surface around them.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

pub mod config;
