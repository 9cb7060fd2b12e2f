//! Columbarium console configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for console.toml
//! - Config resolution (CLI → env → XDG → defaults)
//! - Semantic validation

pub mod resolve;
pub mod settings;
pub mod validate;

pub use resolve::{resolve_config_path, ConfigSource};
pub use settings::Settings;
pub use validate::{validate_settings, ValidationError, ValidationResult};
