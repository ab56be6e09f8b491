//! Configuration layer: typed settings with layered precedence (file → env).

use std::{num::NonZeroU32, str::FromStr};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "edicola";
const DEFAULT_DATABASE_URL: &str = "sqlite://edicola.db";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_RETENTION_KEEP: u32 = 10;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub retention: RetentionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct RetentionSettings {
    /// Published versions kept per list when old versions are pruned.
    pub keep: u32,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

impl LoggingSettings {
    pub fn level_filter(&self) -> Result<LevelFilter, LoadError> {
        LevelFilter::from_str(self.level.as_str())
            .map_err(|err| LoadError::invalid("logging.level", format!("failed to parse: {err}")))
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings from the default config files and `EDICOLA__`-prefixed
/// environment variables.
pub fn load() -> Result<Settings, LoadError> {
    let builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false))
        .add_source(Environment::with_prefix("EDICOLA").separator("__"));

    let raw: RawSettings = builder.build()?.try_deserialize()?;
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    database: RawDatabaseSettings,
    retention: RawRetentionSettings,
    logging: RawLoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDatabaseSettings {
    url: Option<String>,
    max_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawRetentionSettings {
    keep: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            database,
            retention,
            logging,
        } = raw;

        Ok(Self {
            database: build_database_settings(database)?,
            retention: build_retention_settings(retention),
            logging: build_logging_settings(logging)?,
        })
    }
}

fn build_database_settings(database: RawDatabaseSettings) -> Result<DatabaseSettings, LoadError> {
    let url = database
        .url
        .and_then(|value| {
            let trimmed = value.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

    let max_value = database
        .max_connections
        .unwrap_or(DEFAULT_DB_MAX_CONNECTIONS);
    let max_connections = NonZeroU32::new(max_value).ok_or_else(|| {
        LoadError::invalid("database.max_connections", "must be greater than zero")
    })?;

    Ok(DatabaseSettings {
        url,
        max_connections,
    })
}

fn build_retention_settings(retention: RawRetentionSettings) -> RetentionSettings {
    RetentionSettings {
        keep: retention.keep.unwrap_or(DEFAULT_RETENTION_KEEP),
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let settings = LoggingSettings {
        level: logging
            .level
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        format: if logging.json.unwrap_or(false) {
            LogFormat::Json
        } else {
            LogFormat::Compact
        },
    };

    // Reject unparseable levels at load time instead of at subscriber install.
    settings.level_filter()?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");
        assert_eq!(settings.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(settings.database.max_connections.get(), 8);
        assert_eq!(settings.retention.keep, DEFAULT_RETENTION_KEEP);
        assert_eq!(
            settings.logging.level_filter().expect("parsable level"),
            LevelFilter::INFO
        );
        assert!(matches!(settings.logging.format, LogFormat::Compact));
    }

    #[test]
    fn blank_database_url_falls_back_to_default() {
        let raw = RawSettings {
            database: RawDatabaseSettings {
                url: Some("   ".to_string()),
                max_connections: None,
            },
            ..Default::default()
        };

        let settings = Settings::from_raw(raw).expect("valid settings");
        assert_eq!(settings.database.url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let raw = RawSettings {
            database: RawDatabaseSettings {
                url: None,
                max_connections: Some(0),
            },
            ..Default::default()
        };

        assert!(matches!(
            Settings::from_raw(raw),
            Err(LoadError::Invalid { key, .. }) if key == "database.max_connections"
        ));
    }

    #[test]
    fn bogus_log_level_is_rejected_at_load() {
        let raw = RawSettings {
            logging: RawLoggingSettings {
                level: Some("chatty".to_string()),
                json: None,
            },
            ..Default::default()
        };

        assert!(matches!(
            Settings::from_raw(raw),
            Err(LoadError::Invalid { key, .. }) if key == "logging.level"
        ));
    }

    #[test]
    fn json_flag_selects_json_format() {
        let raw = RawSettings {
            logging: RawLoggingSettings {
                level: None,
                json: Some(true),
            },
            ..Default::default()
        };

        let settings = Settings::from_raw(raw).expect("valid settings");
        assert!(matches!(settings.logging.format, LogFormat::Json));
    }
}
