use thiserror::Error;

use crate::config::LoadError;

/// Bootstrap failures: pool setup, migrations, settings, subscriber install.
/// Repository-level failures surface as `RepoError` instead.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("database error: {message}")]
    Database { message: String },
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
    #[error("configuration error: {0}")]
    Configuration(#[from] LoadError),
}

impl InfraError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    pub fn telemetry(message: impl Into<String>) -> Self {
        Self::Telemetry(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_load_failures_convert_into_configuration_errors() {
        let load = LoadError::Invalid {
            key: "database.max_connections",
            reason: "must be greater than zero".into(),
        };
        let err = InfraError::from(load);
        assert!(matches!(err, InfraError::Configuration(_)));
        assert!(err.to_string().contains("database.max_connections"));
    }
}
