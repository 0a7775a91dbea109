//! Configuration error types

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A strictly-typed property value could not be parsed
    #[error("Invalid value {value:?} for property {key}: expected {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },

    /// A `key=value` block entry was syntactically invalid
    #[error(transparent)]
    MalformedProperty(#[from] poolside_properties::PropertiesError),

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Database error from the pooling backend
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Generic error message
    #[error("Configuration error: {message}")]
    Generic { message: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
