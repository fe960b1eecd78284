//! User settings persisted between sessions.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8080";

/// Color scheme preference.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

/// All persisted user settings. Missing fields fall back to their
/// defaults, so old settings files keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub backend_url: String,
    pub theme: Theme,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            theme: Theme::default(),
        }
    }
}

impl Settings {
    /// Normalizes a raw backend URL entry: surrounding whitespace is
    /// trimmed and an empty entry falls back to the default.
    pub fn normalize_backend_url(raw: &str) -> String {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            DEFAULT_BACKEND_URL.to_string()
        } else {
            trimmed.to_string()
        }
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn normalize_trims_and_defaults() {
        assert_eq!(
            Settings::normalize_backend_url("  http://lab-server:9000  "),
            "http://lab-server:9000"
        );
        assert_eq!(Settings::normalize_backend_url("   "), DEFAULT_BACKEND_URL);
        assert_eq!(Settings::normalize_backend_url(""), DEFAULT_BACKEND_URL);
    }

    #[test]
    fn theme_parses_lowercase_names() {
        assert_eq!(Theme::from_str("dark").unwrap(), Theme::Dark);
        assert_eq!(Theme::Auto.to_string(), "auto");
        assert!(Theme::from_str("sepia").is_err());
    }

    #[test]
    fn default_detection() {
        let mut settings = Settings::default();
        assert!(settings.is_default());

        settings.backend_url = "http://elsewhere:8080".to_string();
        assert!(!settings.is_default());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str(r#"theme = "dark""#).unwrap();
        assert_eq!(settings.backend_url, DEFAULT_BACKEND_URL);
        assert_eq!(settings.theme, Theme::Dark);
    }
}
