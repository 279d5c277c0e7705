//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::ClientConfig;
use crate::session::FileTokenStore;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8001/api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ApiConfig {
    /// Settings for the HTTP client
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            request_timeout_ms: self.request_timeout_secs.saturating_mul(1000),
        }
    }
}

/// Session persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
}

fn default_token_file() -> PathBuf {
    FileTokenStore::default_path()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from the first default location that exists, or from the
    /// environment alone when none does.
    ///
    /// A file that exists but cannot be read or parsed is an error rather
    /// than a silent fallback to defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("datalyn").join("config.toml")),
            Some(PathBuf::from("./datalyn.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|p| p.exists()) {
            Some(path) => {
                let config = Self::load_with_env(path)?;
                tracing::debug!("Loaded config from {:?}", path);
                Ok(config)
            }
            None => {
                tracing::debug!("Using default config with environment overrides");
                Ok(Self::from_env())
            }
        }
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(url) = var("DATALYN_API_URL") {
            self.api.base_url = url;
        }
        if let Some(timeout) = var("DATALYN_REQUEST_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.api.request_timeout_secs = t;
            }
        }

        // Session overrides
        if let Some(path) = var("DATALYN_TOKEN_FILE") {
            self.session.token_file = PathBuf::from(path);
        }

        // Logging overrides
        if let Some(level) = var("DATALYN_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("DATALYN_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Datalyn Configuration
#
# Environment variables override these settings:
# - DATALYN_API_URL
# - DATALYN_REQUEST_TIMEOUT
# - DATALYN_TOKEN_FILE
# - DATALYN_LOG_LEVEL
# - DATALYN_LOG_FORMAT

[api]
# Backend base URL, including the /api prefix
base_url = "http://localhost:8001/api"

# Request timeout in seconds
request_timeout_secs = 30

[session]
# Where the session token is kept between runs
# token_file = "~/.local/share/datalyn/session.json"

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.api.base_url, "http://localhost:8001/api");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.session.token_file.ends_with("session.json"));
    }

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8001/api");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("datalyn.toml");
        std::fs::write(
            &path,
            "[api]\nbase_url = \"https://app.datalyn.io/api\"\n[session]\ntoken_file = \"/tmp/tok.json\"\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.api.base_url, "https://app.datalyn.io/api");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(config.session.token_file, PathBuf::from("/tmp/tok.json"));
    }

    #[test]
    fn test_missing_and_invalid_files() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load(&missing), Err(ConfigError::Io { .. })));

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "[api\nbase_url = ").unwrap();
        assert!(matches!(Config::load(&bad), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("DATALYN_API_URL", "http://staging:9000/api"),
            ("DATALYN_REQUEST_TIMEOUT", "5"),
            ("DATALYN_TOKEN_FILE", "/var/lib/datalyn/token.json"),
            ("DATALYN_LOG_FORMAT", "json"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "http://staging:9000/api");
        assert_eq!(config.api.request_timeout_secs, 5);
        assert_eq!(
            config.session.token_file,
            PathBuf::from("/var/lib/datalyn/token.json")
        );
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_bad_timeout_is_ignored() {
        let mut config = Config::default();
        config.apply_overrides(|k| (k == "DATALYN_REQUEST_TIMEOUT").then(|| "soon".to_string()));
        assert_eq!(config.api.request_timeout_secs, 30);
    }

    #[test]
    fn test_huge_timeout_does_not_panic() {
        let mut config = Config::default();
        config.apply_overrides(|k| {
            (k == "DATALYN_REQUEST_TIMEOUT").then(|| u64::MAX.to_string())
        });
        assert_eq!(config.api.request_timeout_secs, u64::MAX);
        assert_eq!(config.api.client_config().request_timeout_ms, u64::MAX);
    }

    #[test]
    fn test_malformed_file_in_search_path_is_reported() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let bad = dir.path().join("bad.toml");
        let good = dir.path().join("good.toml");
        std::fs::write(&bad, "[api\nbase_url = ").unwrap();
        std::fs::write(&good, "[api]\nbase_url = \"http://good/api\"\n").unwrap();

        let result = Config::load_first(&[missing, bad.clone(), good]);
        match result {
            Err(ConfigError::Parse { path, .. }) => assert_eq!(path, bad),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_search_path_skips_missing_files() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("good.toml");
        std::fs::write(&good, "[api]\nbase_url = \"http://good/api\"\n").unwrap();

        let config = Config::load_first(&[dir.path().join("missing.toml"), good]).unwrap();
        assert_eq!(config.api.base_url, "http://good/api");

        let fallback = Config::load_first(&[dir.path().join("missing.toml")]).unwrap();
        assert!(fallback.api.request_timeout_secs > 0);
    }

    #[test]
    fn test_client_config() {
        let client = ApiConfig {
            base_url: "http://x/api".to_string(),
            request_timeout_secs: 3,
        }
        .client_config();
        assert_eq!(client.request_timeout_ms, 3000);
    }
}
