//! Poolside delimited-text parsing crate
//!
//! This crate provides the two small text formats the data-source property
//! binder consumes: delimiter-separated value lists (SQL init statements,
//! disconnection SQL-state codes) and semicolon-separated `key=value`
//! property blocks (driver connection properties).

pub mod delimited;
pub mod error;

// Re-export main types
pub use delimited::{parse_list, parse_properties};
pub use error::{PropertiesError, PropertiesResult};
