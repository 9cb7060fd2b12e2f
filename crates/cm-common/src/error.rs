//! Error types for the columbarium console.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints
//! - Remediation suggestions for humans
//!
//! Errors can be formatted for human consumption with headline, reason,
//! and fix:
//! ```text
//! ✗ Authentication Error
//!   Reason: session rejected by server (status 401)
//!   Fix: Log in again and pass the new token via --token or CM_SESSION_TOKEN.
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for console operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file and flag errors.
    Config,
    /// Session token and authorization errors.
    Auth,
    /// Network transport and server-side errors.
    Api,
    /// Response body decode errors.
    Decode,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Auth => write!(f, "auth"),
            ErrorCategory::Api => write!(f, "api"),
            ErrorCategory::Decode => write!(f, "decode"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for the columbarium console.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid config file: {0}")]
    InvalidConfig(String),

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    // Auth errors (20-29)
    #[error("no session token configured")]
    MissingToken,

    #[error("session rejected by server (status {status})")]
    SessionRejected { status: u16 },

    // API errors (30-39)
    #[error("network error: {0}")]
    Network(String),

    #[error("server returned status {status} for {path}")]
    Status { status: u16, path: String },

    #[error("unknown entity: {0}")]
    UnknownEntity(String),

    #[error("entity {0} is read-only")]
    ReadOnlyEntity(String),

    // Decode errors (40-49)
    #[error("response decode failed: {0}")]
    Decode(String),

    // I/O errors (50-59)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the stable error code for this error type.
    ///
    /// Codes are grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Auth errors
    /// - 30-39: API errors
    /// - 40-49: Decode errors
    /// - 50-59: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidConfig(_) => 11,
            Error::InvalidBaseUrl(_) => 12,
            Error::MissingToken => 20,
            Error::SessionRejected { .. } => 21,
            Error::Network(_) => 30,
            Error::Status { .. } => 31,
            Error::UnknownEntity(_) => 32,
            Error::ReadOnlyEntity(_) => 33,
            Error::Decode(_) => 40,
            Error::Io(_) => 50,
            Error::Json(_) => 51,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidConfig(_) | Error::InvalidBaseUrl(_) => {
                ErrorCategory::Config
            }
            Error::MissingToken | Error::SessionRejected { .. } => ErrorCategory::Auth,
            Error::Network(_)
            | Error::Status { .. }
            | Error::UnknownEntity(_)
            | Error::ReadOnlyEntity(_) => ErrorCategory::Api,
            Error::Decode(_) => ErrorCategory::Decode,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable by retrying
    /// or adjusting inputs.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Config(_) => true,
            Error::InvalidConfig(_) => true,
            Error::InvalidBaseUrl(_) => true,
            Error::MissingToken => true,
            Error::SessionRejected { .. } => true, // Re-login possible
            Error::Network(_) => true,             // Often transient
            Error::Status { status, .. } => *status >= 500,
            Error::UnknownEntity(_) => false,
            Error::ReadOnlyEntity(_) => false,
            Error::Decode(_) => false, // Server/client version skew
            Error::Io(_) => true,
            Error::Json(_) => true,
        }
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => {
                "Run 'cm-console check' to validate configuration, or check flag values."
            }
            Error::InvalidConfig(_) => {
                "Check the TOML syntax in the config file, or delete it to use defaults."
            }
            Error::InvalidBaseUrl(_) => {
                "Base URL must start with http:// or https:// and have no trailing path."
            }
            Error::MissingToken => {
                "Pass a session token via --token or the CM_SESSION_TOKEN environment variable."
            }
            Error::SessionRejected { .. } => {
                "Log in again and pass the new token via --token or CM_SESSION_TOKEN."
            }
            Error::Network(_) => {
                "Check that the server is reachable and the base URL is correct. Retry the request."
            }
            Error::Status { .. } => {
                "Check server logs for the failing endpoint. 5xx responses are usually transient."
            }
            Error::UnknownEntity(_) => {
                "Entity name is not registered. Valid names are listed by 'cm-console check'."
            }
            Error::ReadOnlyEntity(_) => {
                "Audit logs cannot be created, edited, or deleted from the console."
            }
            Error::Decode(_) => {
                "Response body did not match the expected shape. Check server and console versions."
            }
            Error::Io(_) => {
                "Check disk space, permissions, and that config directories exist. Retry the operation."
            }
            Error::Json(_) => {
                "Invalid JSON in file. Check syntax or restore from backup."
            }
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidConfig(_) => "Invalid Config File",
            Error::InvalidBaseUrl(_) => "Invalid Base URL",
            Error::MissingToken => "Missing Session Token",
            Error::SessionRejected { .. } => "Authentication Error",
            Error::Network(_) => "Network Error",
            Error::Status { .. } => "Server Error",
            Error::UnknownEntity(_) => "Unknown Entity",
            Error::ReadOnlyEntity(_) => "Read-Only Entity",
            Error::Decode(_) => "Response Decode Error",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Format an error for human-readable stderr output.
///
/// Output format:
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(Error::Config("test".into()).code(), 10);
        assert_eq!(Error::MissingToken.code(), 20);
        assert_eq!(
            Error::Status { status: 500, path: "/api/customer/list-all/".into() }.code(),
            31
        );
    }

    #[test]
    fn test_error_category() {
        assert_eq!(Error::Config("test".into()).category(), ErrorCategory::Config);
        assert_eq!(
            Error::SessionRejected { status: 401 }.category(),
            ErrorCategory::Auth
        );
        assert_eq!(Error::Decode("bad".into()).category(), ErrorCategory::Decode);
    }

    #[test]
    fn test_error_recoverable() {
        assert!(Error::Network("timeout".into()).is_recoverable());
        assert!(Error::Status { status: 503, path: "/x".into() }.is_recoverable());
        assert!(!Error::Status { status: 404, path: "/x".into() }.is_recoverable());
        assert!(!Error::UnknownEntity("widgets".into()).is_recoverable());
    }

    #[test]
    fn test_format_error_human() {
        let err = Error::SessionRejected { status: 401 };
        let formatted = format_error_human(&err, false);

        assert!(formatted.contains("Authentication Error"));
        assert!(formatted.contains("status 401"));
        assert!(formatted.contains("--token"));
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Config.to_string(), "config");
        assert_eq!(ErrorCategory::Auth.to_string(), "auth");
    }
}
