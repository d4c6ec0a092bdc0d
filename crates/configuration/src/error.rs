//! Errors that can be thrown when processing configuration.

use std::path::PathBuf;

/// The errors that can be thrown when parsing a configuration directory.
#[derive(Debug, thiserror::Error)]
pub enum ParseConfigurationError {
    #[error("parse error on {file_path}:{line}:{column}: {message}")]
    ParseError {
        file_path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("I/O error: {0}")]
    IoErrorButStringified(String),
}

/// The errors that can be thrown when writing a configuration directory.
#[derive(Debug, thiserror::Error)]
pub enum WriteParsedConfigurationError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("could not serialize configuration: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// The errors that can be thrown when turning a parsed configuration into a runtime one.
#[derive(Debug, thiserror::Error)]
pub enum MakeRuntimeConfigurationError {
    #[error("unsupported configuration version {0}, expected {1}")]
    UnsupportedVersion(u32, u32),

    #[error("invalid time zone: {0}")]
    InvalidTimeZone(#[from] query_engine_sql::sql::format::Error),

    #[error("maxDepth must be at least 1")]
    ZeroMaxDepth,
}
