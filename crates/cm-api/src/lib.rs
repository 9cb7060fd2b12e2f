//! REST client and wire models for the columbarium management server.
//!
//! This crate provides:
//! - Entity kinds with their endpoint paths
//! - Typed wire models (serde, snake_case on the wire)
//! - A blocking HTTP client that attaches the session token to every request

pub mod client;
pub mod entity;
pub mod models;

pub use client::ApiClient;
pub use entity::EntityKind;
