//! Error types for the analytics tools

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that abort an analytics run.
///
/// The one recoverable condition - an optional view that is reachable but
/// empty - is not an error at all; it surfaces as
/// [`SectionResult::Absent`](crate::report::SectionResult).
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// Configuration error, raised before any query is attempted
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Connection or query error from the database driver
    #[error("Database error: {0}")]
    Database(#[from] tokio_postgres::Error),

    /// A SQL statement file failed to apply during installation
    #[error("Failed to apply {file}")]
    Install {
        file: String,
        #[source]
        source: tokio_postgres::Error,
    },

    /// The installer found no ordered statement files to apply
    #[error("No SQL files matching NN_*.sql found in {0}")]
    NoSqlFiles(PathBuf),

    /// IO error (reading statement files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_enter_the_taxonomy() {
        let config_err = ConfigError::Invalid {
            key: "PGPORT",
            value: "not-a-port".to_string(),
            reason: "invalid digit found in string".to_string(),
        };
        let err: AnalyticsError = config_err.into();
        assert!(matches!(err, AnalyticsError::Config(_)));
        assert!(err.to_string().starts_with("Configuration error"));
    }
}
