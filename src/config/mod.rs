//! Configuration layer: typed settings with layered precedence (file → env).

use std::{num::NonZeroU32, str::FromStr};

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "vetrina";
const ENV_PREFIX: &str = "VETRINA";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;

/// Fully-resolved deployment settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub database: DatabaseSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub max_connections: NonZeroU32,
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

/// Load settings using the configured precedence (file → environment).
pub fn load() -> Result<Settings, LoadError> {
    let raw: RawSettings = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false))
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?
        .try_deserialize()?;

    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    database: RawDatabaseSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawDatabaseSettings {
    url: Option<String>,
    max_connections: Option<u32>,
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings { logging, database } = raw;
        Ok(Self {
            logging: build_logging_settings(logging)?,
            database: build_database_settings(database)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_database_settings(database: RawDatabaseSettings) -> Result<DatabaseSettings, LoadError> {
    let url = database.url.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let settings = Settings::from_raw(RawSettings::default()).expect("valid settings");

        assert_eq!(settings.logging.level, LevelFilter::INFO);
        assert!(matches!(settings.logging.format, LogFormat::Compact));
        assert!(settings.database.url.is_none());
        assert_eq!(
            settings.database.max_connections.get(),
            DEFAULT_DB_MAX_CONNECTIONS
        );
    }

    #[test]
    fn file_values_are_deserialized() {
        let raw: RawSettings = Config::builder()
            .add_source(config::File::from_str(
                "[logging]\nlevel = \"debug\"\njson = true\n\
                 [database]\nurl = \"postgres://example\"\nmax_connections = 4\n",
                config::FileFormat::Toml,
            ))
            .build()
            .expect("config builds")
            .try_deserialize()
            .expect("raw settings deserialize");

        let settings = Settings::from_raw(raw).expect("valid settings");
        assert_eq!(settings.logging.level, LevelFilter::DEBUG);
        assert!(matches!(settings.logging.format, LogFormat::Json));
        assert_eq!(settings.database.url.as_deref(), Some("postgres://example"));
        assert_eq!(settings.database.max_connections.get(), 4);
    }

    #[test]
    fn blank_database_url_is_treated_as_unset() {
        let raw = RawSettings {
            database: RawDatabaseSettings {
                url: Some("   ".to_string()),
                max_connections: None,
            },
            ..Default::default()
        };

        let settings = Settings::from_raw(raw).expect("valid settings");
        assert!(settings.database.url.is_none());
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

        let err = Settings::from_raw(raw).expect_err("zero pool size");
        assert!(matches!(
            err,
            LoadError::Invalid {
                key: "database.max_connections",
                ..
            }
        ));
    }

    #[test]
    fn invalid_log_level_is_rejected() {
        let raw = RawSettings {
            logging: RawLoggingSettings {
                level: Some("verbose".to_string()),
                json: None,
            },
            ..Default::default()
        };

        let err = Settings::from_raw(raw).expect_err("bad level");
        assert!(matches!(
            err,
            LoadError::Invalid {
                key: "logging.level",
                ..
            }
        ));
    }
}
