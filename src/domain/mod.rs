//! Domain types describing the remote entities managed by the dashboard.

pub mod auth;
pub mod blog;
pub mod catalog;
pub mod location;
pub mod people;
pub mod resource;
pub mod types;
