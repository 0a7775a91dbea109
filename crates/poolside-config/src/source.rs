//! Property-set sources
//!
//! The binder is source-agnostic; anything that can produce a flat
//! [`PropertyMap`] can feed it. This module supplies the file-based source:
//! a TOML document whose top-level table holds scalar values, each rendered
//! to the string form the binder parses.

use std::path::Path;

use crate::error::{ConfigError, ConfigResult};
use crate::PropertyMap;

/// Loads a flat property set from a TOML file.
///
/// Only top-level scalars are accepted: strings bind verbatim, integers and
/// booleans are rendered to their canonical text form. Tables, arrays and
/// other structured values are rejected, since the binder's nested formats
/// (`connectionProperties`, `connectionInitSqls`) are themselves strings.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, a TOML error if it does
/// not parse, or [`ConfigError::Generic`] for a structured value.
pub fn properties_from_toml_file(path: impl AsRef<Path>) -> ConfigResult<PropertyMap> {
    let content = std::fs::read_to_string(path.as_ref())?;
    properties_from_toml_str(&content)
}

/// Shared parsing behind [`properties_from_toml_file`].
///
/// # Errors
///
/// Same failure modes as the file variant, minus I/O.
pub fn properties_from_toml_str(content: &str) -> ConfigResult<PropertyMap> {
    let table: toml::Table = content.parse()?;
    let mut properties = PropertyMap::new();
    for (key, value) in table {
        let rendered = match value {
            toml::Value::String(s) => s,
            toml::Value::Integer(i) => i.to_string(),
            toml::Value::Float(f) => f.to_string(),
            toml::Value::Boolean(b) => b.to_string(),
            toml::Value::Datetime(d) => d.to_string(),
            toml::Value::Array(_) | toml::Value::Table(_) => {
                return Err(ConfigError::Generic {
                    message: format!(
                        "Property {key} must be a scalar value, not a table or array"
                    ),
                });
            }
        };
        tracing::debug!(key = %key, "loaded property from file");
        properties.insert(key, rendered);
    }
    Ok(properties)
}
