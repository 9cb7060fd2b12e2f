//! Record and session identity types.
//!
//! Record IDs are server-assigned primary keys. They are opaque to the
//! console and only ever echoed back in edit/delete requests.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-assigned primary key for a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for RecordId {
    fn from(id: i64) -> Self {
        RecordId(id)
    }
}

/// Opaque session token issued at login.
///
/// Sent on every request as both the `Session-Token` header and the
/// `Authorization: Session <token>` header. The Debug impl redacts the
/// value so tokens never land in logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        SessionToken(token.into())
    }

    /// The raw token value, for building request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionToken(***)")
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        SessionToken(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_display() {
        assert_eq!(RecordId(42).to_string(), "42");
    }

    #[test]
    fn test_record_id_serde_transparent() {
        let id: RecordId = serde_json::from_str("17").unwrap();
        assert_eq!(id, RecordId(17));
        assert_eq!(serde_json::to_string(&id).unwrap(), "17");
    }

    #[test]
    fn test_session_token_debug_redacts() {
        let token = SessionToken::new("abc123secret");
        assert_eq!(format!("{:?}", token), "SessionToken(***)");
    }

    #[test]
    fn test_session_token_expose() {
        let token = SessionToken::new("abc123");
        assert_eq!(token.expose(), "abc123");
        assert!(!token.is_empty());
        assert!(SessionToken::new("").is_empty());
    }
}
