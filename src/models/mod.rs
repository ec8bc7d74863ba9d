//! Server-side models: configuration and the session token.

pub mod auth;
pub mod config;
