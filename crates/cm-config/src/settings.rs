//! Typed settings loaded from console.toml.

use cm_common::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Console settings, loadable from a TOML file.
///
/// Every field has a default so a missing or partial file is fine. Flags
/// and environment variables override file values after loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Base URL of the management server, without a trailing slash.
    pub base_url: String,

    /// Session token. Usually supplied via flag or environment instead
    /// of being written to disk.
    pub token: Option<String>,

    /// Theme name: dark, light, high-contrast, or none.
    pub theme: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            base_url: "http://127.0.0.1:8000".to_string(),
            token: None,
            theme: "dark".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn load(path: &Path) -> Result<Settings> {
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Load settings from a file if one resolved, otherwise defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Settings> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Settings::default()),
        }
    }

    /// Apply overrides from flags/environment on top of file values.
    pub fn with_overrides(
        mut self,
        base_url: Option<String>,
        token: Option<String>,
        theme: Option<String>,
    ) -> Settings {
        if let Some(url) = base_url {
            self.base_url = url;
        }
        if let Some(t) = token {
            self.token = Some(t);
        }
        if let Some(t) = theme {
            self.theme = t;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.base_url, "http://127.0.0.1:8000");
        assert_eq!(s.theme, "dark");
        assert_eq!(s.timeout_secs, 10);
        assert!(s.token.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "base_url = \"https://cms.example.org\"").unwrap();
        writeln!(f, "theme = \"light\"").unwrap();

        let s = Settings::load(f.path()).unwrap();
        assert_eq!(s.base_url, "https://cms.example.org");
        assert_eq!(s.theme, "light");
        // Unset fields fall back to defaults
        assert_eq!(s.timeout_secs, 10);
    }

    #[test]
    fn test_load_rejects_unknown_fields() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "base_urll = \"typo\"").unwrap();

        assert!(Settings::load(f.path()).is_err());
    }

    #[test]
    fn test_overrides_win() {
        let s = Settings::default().with_overrides(
            Some("https://override.example".into()),
            Some("tok".into()),
            None,
        );
        assert_eq!(s.base_url, "https://override.example");
        assert_eq!(s.token.as_deref(), Some("tok"));
        assert_eq!(s.theme, "dark");
    }
}
