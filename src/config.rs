//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub weather: WeatherConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Observation store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

fn default_data_file() -> String {
    dirs::data_local_dir()
        .map(|p| {
            p.join("flarecast")
                .join("observations.json")
                .to_string_lossy()
                .to_string()
        })
        .unwrap_or_else(|| "./observations.json".to_string())
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8086
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec!["http://localhost:8087".to_string()],
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Weather provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    #[serde(default = "default_geocoding_url")]
    pub geocoding_url: String,

    /// Place name resolved to coordinates at startup
    #[serde(default = "default_location")]
    pub location: String,

    #[serde(default = "default_max_forecast_days")]
    pub max_forecast_days: usize,

    #[serde(default = "default_min_fetch_interval")]
    pub min_fetch_interval_secs: u64,

    #[serde(default = "default_location_timeout")]
    pub location_timeout_secs: u64,
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com".to_string()
}

fn default_location() -> String {
    "Tokyo".to_string()
}

fn default_max_forecast_days() -> usize {
    5
}

fn default_min_fetch_interval() -> u64 {
    600
}

fn default_location_timeout() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            geocoding_url: default_geocoding_url(),
            location: default_location(),
            max_forecast_days: default_max_forecast_days(),
            min_fetch_interval_secs: default_min_fetch_interval(),
            location_timeout_secs: default_location_timeout(),
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
    "info".to_string()
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

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
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

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("flarecast").join("config.toml")),
            Some(PathBuf::from("/etc/flarecast/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(data_file) = std::env::var("FLARECAST_DATA_FILE") {
            self.store.data_file = data_file;
        }

        if let Ok(host) = std::env::var("FLARECAST_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("FLARECAST_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }

        if let Ok(location) = std::env::var("FLARECAST_LOCATION") {
            self.weather.location = location;
        }
        if let Ok(days) = std::env::var("FLARECAST_MAX_FORECAST_DAYS") {
            if let Ok(d) = days.parse() {
                self.weather.max_forecast_days = d;
            }
        }

        if let Ok(level) = std::env::var("FLARECAST_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("FLARECAST_LOG_FORMAT") {
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
    r#"# Flarecast Configuration
#
# Environment variables override these settings:
# - FLARECAST_DATA_FILE
# - FLARECAST_API_HOST
# - FLARECAST_API_PORT
# - FLARECAST_LOCATION
# - FLARECAST_MAX_FORECAST_DAYS
# - FLARECAST_LOG_LEVEL
# - FLARECAST_LOG_FORMAT

[store]
# JSON file holding pain observations
data_file = "~/.local/share/flarecast/observations.json"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 8086

# Allowed CORS origins
cors_origins = ["http://localhost:8087"]

[weather]
# Open-Meteo forecast endpoint
forecast_url = "https://api.open-meteo.com"

# Open-Meteo geocoding endpoint
geocoding_url = "https://geocoding-api.open-meteo.com"

# Place name used to key forecast fetches
location = "Tokyo"

# Days of forecast to aggregate
max_forecast_days = 5

# Minimum seconds between provider fetches
min_fetch_interval_secs = 600

# Seconds before a location lookup fails
location_timeout_secs = 10

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.weather.max_forecast_days, 5);
        assert_eq!(config.weather.min_fetch_interval_secs, 600);
        assert_eq!(config.weather.location_timeout_secs, 10);
        assert_eq!(config.api.port, 8086);
    }

    #[test]
    fn test_load_from_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[weather]
location = "Sapporo"
max_forecast_days = 3

[api]
port = 9000
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.weather.location, "Sapporo");
        assert_eq!(config.weather.max_forecast_days, 3);
        assert_eq!(config.api.port, 9000);
        // Untouched sections keep defaults
        assert_eq!(config.weather.min_fetch_interval_secs, 600);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not valid toml [[[").unwrap();

        let result = Config::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_generated_default_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.weather.max_forecast_days, 5);
    }
}
