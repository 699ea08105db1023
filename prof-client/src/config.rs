//! Configuration loading for the ProfesionalesUY client.
//!
//! Configuration is loaded from a TOML file (default: `profesionales.toml`).
//! Every section and key is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend API configuration.
    #[serde(default)]
    pub api: ApiConfig,
    /// Address geocoding configuration.
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// Screen timing configuration.
    #[serde(default)]
    pub ui: UiConfig,
}

/// Backend API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix (default: http://127.0.0.1:4000/api).
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 15).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Address geocoding configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Nominatim-compatible search endpoint base.
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    /// Look addresses up at all (default: true). When off, every address
    /// resolves to `[0, 0]`.
    #[serde(default = "default_geocoding_enabled")]
    pub enabled: bool,
}

/// Screen timing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Quiet period after the last keystroke before searching (default: 500ms).
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Delay between the connect banner and the Messages redirect (default: 1500ms).
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
}

// Default value functions
fn default_api_base_url() -> String {
    "http://127.0.0.1:4000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_geocoding_enabled() -> bool {
    true
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_redirect_delay_ms() -> u64 {
    profesionales_core::DEFAULT_REDIRECT_DELAY.as_millis() as u64
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            enabled: default_geocoding_enabled(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: default_search_debounce_ms(),
            redirect_delay_ms: default_redirect_delay_ms(),
        }
    }
}

impl UiConfig {
    /// Search debounce as a duration.
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Redirect delay as a duration.
    pub fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Load from `path` if it exists, else defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// Failed to parse configuration file.
    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying TOML parse error.
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, "http://127.0.0.1:4000/api");
        assert_eq!(config.api.timeout_secs, 15);
        assert!(config.geocoding.enabled);
        assert_eq!(config.ui.redirect_delay(), Duration::from_millis(1500));
    }

    #[test]
    fn config_from_toml_string() {
        let toml = r#"
[api]
base_url = "https://api.profesionales.uy/api"
timeout_secs = 5

[geocoding]
enabled = false

[ui]
search_debounce_ms = 250
"#;

        let config: ClientConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.api.base_url, "https://api.profesionales.uy/api");
        assert_eq!(config.api.timeout_secs, 5);
        assert!(!config.geocoding.enabled);
        assert_eq!(
            config.geocoding.base_url,
            "https://nominatim.openstreetmap.org"
        );
        assert_eq!(config.ui.search_debounce(), Duration::from_millis(250));
        assert_eq!(config.ui.redirect_delay_ms, 1500);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = ClientConfig::load_or_default(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn unreadable_toml_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[api\nbase_url = 3").unwrap();

        let err = ClientConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }
}
