//! Layered application configuration.
//!
//! Sources, lowest priority first: built-in defaults, the user config file
//! (`<config dir>/cinemontauge/config.toml`), `cinemontauge.toml` in the
//! working directory (or an explicit path instead of both files), then
//! `CINEMONTAUGE__SECTION__KEY` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{
    catalog::{TMDB_BASE_URL, TMDB_IMAGE_BASE},
    tracker::TrackerConfig,
};

const APP_NAME: &str = "cinemontauge";
const ENV_PREFIX: &str = "CINEMONTAUGE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub catalog: CatalogConfig,
    pub oauth: OAuthConfig,
    pub tracker: TrackerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7878,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        let path = data_dir().join(format!("{APP_NAME}.db"));
        Self {
            url: format!("sqlite://{}?mode=rwc", path.display()),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// TMDB API key; catalog routes are unavailable without one
    pub tmdb_api_key: Option<String>,
    pub base_url: String,
    pub image_base_url: String,
    pub cache_ttl_secs: u64,
    pub cache_max_entries: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            base_url: TMDB_BASE_URL.to_string(),
            image_base_url: TMDB_IMAGE_BASE.to_string(),
            cache_ttl_secs: 6 * 3600,
            cache_max_entries: 500,
        }
    }
}

/// Credentials the token exchange proxy adds to every upstream request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl OAuthConfig {
    pub fn is_configured(&self) -> bool {
        !self.token_url.is_empty() && !self.client_id.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence
    pub level: String,
    pub format: LogFormat,
    /// Also write daily-rotated log files here
    pub directory: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info,cinemontauge=debug".to_string(),
            format: LogFormat::Pretty,
            directory: None,
        }
    }
}

/// Per-user data directory for the default database location
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_NAME))
        .unwrap_or_else(|| PathBuf::from("."))
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        match path {
            Some(path) => {
                builder = builder.add_source(File::from(path).required(true));
            }
            None => {
                if let Some(dir) = dirs::config_dir() {
                    let user_file = dir.join(APP_NAME).join("config.toml");
                    builder = builder.add_source(File::from(user_file).required(false));
                }
                builder = builder.add_source(File::with_name(APP_NAME).required(false));
            }
        }

        let config: Self = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("server.port cannot be 0".to_string()));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Message(
                "database.max_connections cannot be 0".to_string(),
            ));
        }
        if self.tracker.midseason_gap_days < 0 {
            return Err(ConfigError::Message(
                "tracker.midseason_gap_days cannot be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 7878);
        assert_eq!(config.tracker.midseason_gap_days, 14);
        assert!(config.catalog.tmdb_api_key.is_none());
        assert!(config.database.url.starts_with("sqlite://"));
        assert!(!config.oauth.is_configured());
    }

    #[test]
    fn test_load_from_file_keeps_unset_defaults() {
        let file = write_config(
            r#"
            [server]
            port = 9000

            [catalog]
            tmdb_api_key = "abc123"

            [tracker]
            midseason_gap_days = 21

            [logging]
            format = "json"
            "#,
        );

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.catalog.tmdb_api_key.as_deref(), Some("abc123"));
        assert_eq!(config.catalog.cache_max_entries, 500);
        assert_eq!(config.tracker.midseason_gap_days, 21);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.bind_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let file = write_config("[server]\nport = 0\n");
        assert!(AppConfig::load(Some(file.path())).is_err());

        let file = write_config("[tracker]\nmidseason_gap_days = -1\n");
        assert!(AppConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let result = AppConfig::load(Some(Path::new("/nonexistent/cinemontauge.toml")));
        assert!(result.is_err());
    }
}
