//! Configuration validation framework
//!
//! Binding accepts anything that parses; validation runs separately, right
//! before a pool is built, so partially assembled configurations can exist
//! in between.

use crate::error::{ConfigError, ConfigResult};
use crate::DataSourceConfig;

/// Trait for validating configuration values
pub trait Validate {
    /// Validate this configuration object
    ///
    /// # Errors
    /// Returns validation errors if the configuration is invalid
    fn validate(&self) -> ConfigResult<()>;
}

/// Validate a string is not empty
///
/// # Errors
/// Returns `ConfigError::MissingField` if the string is empty or whitespace-only
pub fn validate_non_empty(value: &str, field_name: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        Err(ConfigError::MissingField {
            field: field_name.to_string(),
        })
    } else {
        Ok(())
    }
}

impl Validate for DataSourceConfig {
    fn validate(&self) -> ConfigResult<()> {
        let url = self.url.as_deref().ok_or_else(|| ConfigError::MissingField {
            field: "url".to_string(),
        })?;
        validate_non_empty(url, "url")?;

        // Cross-field sanity, only where both sides are bounded
        if self.max_idle >= 0 && self.min_idle > self.max_idle {
            return Err(ConfigError::Generic {
                message: format!(
                    "minIdle ({}) must not exceed maxIdle ({})",
                    self.min_idle, self.max_idle
                ),
            });
        }
        if self.max_total >= 0 && self.initial_size > self.max_total {
            return Err(ConfigError::Generic {
                message: format!(
                    "initialSize ({}) must not exceed maxTotal ({})",
                    self.initial_size, self.max_total
                ),
            });
        }

        Ok(())
    }
}
