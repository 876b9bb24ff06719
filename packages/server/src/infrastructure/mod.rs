//! Infrastructure 層
//!
//! ドメイン層が定義する trait の具体的な実装と、通信用の DTO。

pub mod auth;
pub mod dto;
pub mod message_pusher;
pub mod registry;
pub mod repository;
