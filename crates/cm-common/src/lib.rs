//! Columbarium console common types, IDs, and errors.
//!
//! This crate provides foundational types shared across the console crates:
//! - Record and session identity newtypes
//! - Common error types with categories and remediation hints

pub mod error;
pub mod id;

pub use error::{Error, Result};
pub use id::{RecordId, SessionToken};
