//! Configuration System
//!
//! TOML configuration files with environment-variable overrides.
//!
//! # Configuration File Locations
//!
//! Searched in order (first found wins):
//! 1. `./stresswatch.toml` - project-local configuration
//! 2. `~/.config/stresswatch/config.toml` - user configuration (XDG)
//! 3. `/etc/stresswatch/config.toml` - system-wide configuration
//!
//! # Environment Variables
//!
//! - `SW_LOG_LEVEL` - logging verbosity (quiet, normal, verbose, debug)
//! - `SW_PORT` - HTTP server port
//! - `SW_HOST` - HTTP server bind host
//! - `SW_RESOLUTION` - defuzzification sample points
//! - `SW_STORE_PATH` - assessment log CSV path
//! - `SW_SENSOR_MAX_AGE` - sensor staleness window in seconds

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ErrorCode, Result, StressError};
use crate::fuzzy::engine::{StressEngine, DEFAULT_RESOLUTION, FALLBACK_SCORE};
use crate::sensor::RoomReading;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StresswatchConfig {
    /// General settings
    pub general: GeneralConfig,
    /// Inference engine settings
    pub engine: EngineConfig,
    /// HTTP server settings
    pub server: ServerConfig,
    /// Room sensor settings
    pub sensor: SensorConfig,
    /// Assessment log settings
    pub store: StoreConfig,
}

/// General configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Logging verbosity
    pub log_level: LogLevel,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Normal,
        }
    }
}

/// Logging verbosity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Quiet,
    Normal,
    Verbose,
    Debug,
}

impl LogLevel {
    /// Default tracing filter directive for this level.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Quiet => "warn",
            LogLevel::Normal => "info",
            LogLevel::Verbose => "debug",
            LogLevel::Debug => "trace",
        }
    }
}

/// Inference engine options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Sample points for centroid defuzzification. Changing this shifts the
    /// crisp score by one or two decimal places.
    pub resolution: usize,
    /// Score substituted when no rule fires.
    pub fallback_score: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            fallback_score: FALLBACK_SCORE,
        }
    }
}

impl EngineConfig {
    /// Build an engine from these settings.
    pub fn build(&self) -> StressEngine {
        StressEngine::new()
            .with_resolution(self.resolution)
            .with_fallback(self.fallback_score)
    }
}

/// HTTP server options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,
    /// Host to bind to
    pub host: String,
    /// Enable CORS for browser clients
    pub cors_enabled: bool,
    /// Maximum request body size in bytes
    pub max_body_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 5000,
            host: "0.0.0.0".to_string(),
            cors_enabled: true,
            max_body_size: 1024 * 1024,
        }
    }
}

/// Room sensor options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Staleness window in seconds; readings older than this are flagged.
    pub max_age_secs: u64,
    /// Room conditions assumed until a first reading arrives.
    pub default_temperature: f64,
    pub default_humidity: f64,
    pub default_air_quality: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        // Twice the room node's 900 s send interval.
        Self {
            max_age_secs: 1800,
            default_temperature: 24.0,
            default_humidity: 50.0,
            default_air_quality: 0.5,
        }
    }
}

impl SensorConfig {
    pub fn default_reading(&self) -> RoomReading {
        RoomReading {
            temperature: self.default_temperature,
            humidity: self.default_humidity,
            air_quality: self.default_air_quality,
        }
    }

    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.max_age_secs as i64)
    }
}

/// Assessment log options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// CSV file the ingestion layer appends to.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("usage_data.csv"),
        }
    }
}

impl StresswatchConfig {
    /// Load configuration from the first config file found, then apply
    /// environment overrides. Falls back to defaults when no file exists.
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            StressError::new(
                ErrorCode::ConfigNotFound,
                format!("cannot read {}: {e}", path.display()),
            )
        })?;
        Self::load_from_str(&content)
    }

    pub fn load_from_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| StressError::new(ErrorCode::InvalidConfigSyntax, e.to_string()))
    }

    fn find_config_file() -> Option<PathBuf> {
        let mut candidates = vec![PathBuf::from("stresswatch.toml")];
        if let Some(home) = env::var_os("HOME") {
            candidates.push(
                PathBuf::from(home)
                    .join(".config")
                    .join("stresswatch")
                    .join("config.toml"),
            );
        }
        candidates.push(PathBuf::from("/etc/stresswatch/config.toml"));
        candidates.into_iter().find(|p| p.is_file())
    }

    /// Apply `SW_*` environment-variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("SW_LOG_LEVEL") {
            match val.to_lowercase().as_str() {
                "quiet" => self.general.log_level = LogLevel::Quiet,
                "normal" => self.general.log_level = LogLevel::Normal,
                "verbose" => self.general.log_level = LogLevel::Verbose,
                "debug" => self.general.log_level = LogLevel::Debug,
                _ => {}
            }
        }

        if let Ok(val) = env::var("SW_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }

        if let Ok(val) = env::var("SW_HOST") {
            self.server.host = val;
        }

        if let Ok(val) = env::var("SW_RESOLUTION") {
            if let Ok(resolution) = val.parse() {
                self.engine.resolution = resolution;
            }
        }

        if let Ok(val) = env::var("SW_STORE_PATH") {
            self.store.path = PathBuf::from(val);
        }

        if let Ok(val) = env::var("SW_SENSOR_MAX_AGE") {
            if let Ok(secs) = val.parse() {
                self.sensor.max_age_secs = secs;
            }
        }
    }

    /// Serialize configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| StressError::config(e.to_string()))
    }

    /// Write configuration to a file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        fs::write(path, content)
            .map_err(|e| StressError::config(format!("cannot write {}: {e}", path.display())))
    }

    /// Default configuration file content for `config init`.
    pub fn default_config_content() -> &'static str {
        r#"# stresswatch configuration file

[general]
# Logging verbosity: quiet, normal, verbose, debug
log_level = "normal"

[engine]
# Sample points for centroid defuzzification (101 = integer steps over 0-100).
# Changing this shifts the crisp score by one or two decimal places.
resolution = 101
# Score substituted when no rule fires
fallback_score = 50.0

[server]
# HTTP server port
port = 5000
# Server host
host = "0.0.0.0"
# Enable CORS for browser access
cors_enabled = true
# Maximum request body size (bytes)
max_body_size = 1048576

[sensor]
# Readings older than this many seconds are flagged as stale
max_age_secs = 1800
# Room conditions assumed until a first reading arrives
default_temperature = 24.0
default_humidity = 50.0
default_air_quality = 0.5

[store]
# Assessment log CSV path
path = "usage_data.csv"
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StresswatchConfig::default();

        assert_eq!(config.general.log_level, LogLevel::Normal);
        assert_eq!(config.engine.resolution, 101);
        assert_eq!(config.engine.fallback_score, 50.0);
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.sensor.max_age_secs, 1800);
        assert_eq!(config.store.path, PathBuf::from("usage_data.csv"));
    }

    #[test]
    fn test_load_from_str() {
        let config = StresswatchConfig::load_from_str(
            r#"
            [general]
            log_level = "debug"

            [engine]
            resolution = 201

            [server]
            port = 8080
            host = "127.0.0.1"

            [sensor]
            max_age_secs = 600
            default_temperature = 22.0
            "#,
        )
        .unwrap();

        assert_eq!(config.general.log_level, LogLevel::Debug);
        assert_eq!(config.engine.resolution, 201);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.sensor.max_age_secs, 600);
        assert_eq!(config.sensor.default_temperature, 22.0);
        // Unspecified sections keep their defaults.
        assert_eq!(config.sensor.default_humidity, 50.0);
        assert!(config.server.cors_enabled);
    }

    #[test]
    fn test_invalid_syntax_is_rejected() {
        let err = StresswatchConfig::load_from_str("[server\nport = nope").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidConfigSyntax);
    }

    #[test]
    fn test_default_content_parses() {
        let config =
            StresswatchConfig::load_from_str(StresswatchConfig::default_config_content()).unwrap();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.engine.resolution, 101);
    }

    #[test]
    fn test_round_trip_through_toml() {
        let config = StresswatchConfig::default();
        let text = config.to_toml().unwrap();
        let parsed = StresswatchConfig::load_from_str(&text).unwrap();
        assert_eq!(parsed.server.port, config.server.port);
        assert_eq!(parsed.engine.resolution, config.engine.resolution);
    }

    #[test]
    fn test_sensor_defaults_reading() {
        let sensor = SensorConfig::default();
        let reading = sensor.default_reading();
        assert_eq!(reading.temperature, 24.0);
        assert_eq!(reading.humidity, 50.0);
        assert_eq!(reading.air_quality, 0.5);
        assert_eq!(sensor.max_age(), chrono::Duration::seconds(1800));
    }

    #[test]
    fn test_engine_config_builds_engine() {
        let engine = EngineConfig {
            resolution: 51,
            fallback_score: 42.0,
        }
        .build();
        assert_eq!(engine.resolution(), 51);
    }
}
