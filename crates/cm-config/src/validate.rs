//! Semantic validation of console settings.

use crate::settings::Settings;
use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Settings validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

/// Known theme names.
const THEMES: &[&str] = &["dark", "light", "high-contrast", "none"];

/// Validate settings semantically.
///
/// Checks that the base URL carries an http(s) scheme with no trailing
/// slash, the timeout is nonzero, and the theme name is known.
pub fn validate_settings(settings: &Settings) -> ValidationResult<()> {
    let url = &settings.base_url;
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::InvalidValue {
            field: "base_url".to_string(),
            message: format!("must start with http:// or https://, got {url:?}"),
        });
    }
    if url.ends_with('/') {
        return Err(ValidationError::InvalidValue {
            field: "base_url".to_string(),
            message: "must not end with a slash".to_string(),
        });
    }

    if settings.timeout_secs == 0 {
        return Err(ValidationError::InvalidValue {
            field: "timeout_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if !THEMES.contains(&settings.theme.as_str()) {
        return Err(ValidationError::InvalidValue {
            field: "theme".to_string(),
            message: format!(
                "unknown theme {:?}, expected one of {}",
                settings.theme,
                THEMES.join(", ")
            ),
        });
    }

    Ok(())
}
