//! Identity Gate の実装

pub mod jwt;

pub use jwt::JwtIdentityGate;
