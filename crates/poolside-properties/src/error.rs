//! Error types for the properties crate

use thiserror::Error;

/// Errors raised while parsing delimited property text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PropertiesError {
    /// A `key=value` entry with no `=`, or with `=` as its first or last
    /// character
    #[error("Malformed property entry: '{entry}' in string: {input}")]
    MalformedEntry { entry: String, input: String },
}

/// Result type alias for property parsing operations
pub type PropertiesResult<T> = Result<T, PropertiesError>;
