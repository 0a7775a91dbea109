//! Bridge from a bound configuration to the sqlx pool backend
//!
//! Everything pool-shaped lives in sqlx; this module only translates the
//! fields a [`DataSourceConfig`] carries into sqlx's option builders. Fields
//! sqlx has no counterpart for (statement pooling, abandonment tracking,
//! eviction tuning) are carried in the config for callers that bridge to
//! other backends.

use std::str::FromStr;

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{Executor, PgPool};

use crate::error::{ConfigError, ConfigResult};
use crate::validation::Validate;
use crate::DataSourceConfig;

impl DataSourceConfig {
    /// Effective pool upper bound: `maxTotal` when positive, otherwise
    /// unbounded (the backend still requires a number, so unbounded maps to
    /// `u32::MAX`).
    pub fn effective_max_connections(&self) -> u32 {
        if self.max_total > 0 {
            u32::try_from(self.max_total).unwrap_or(u32::MAX)
        } else {
            u32::MAX
        }
    }

    /// Effective pool lower bound: the larger of `minIdle` and
    /// `initialSize`, since sqlx expresses eager startup connections and the
    /// idle floor through the same knob.
    pub fn effective_min_connections(&self) -> u32 {
        u32::try_from(self.min_idle.max(self.initial_size)).unwrap_or(0)
    }

    /// Builds the pool options this configuration describes.
    pub fn pool_options(&self) -> PgPoolOptions {
        let mut options = PgPoolOptions::new()
            .max_connections(self.effective_max_connections())
            .min_connections(self.effective_min_connections())
            .test_before_acquire(self.test_on_borrow)
            .idle_timeout(self.min_evictable_idle)
            .max_lifetime(self.max_conn_lifetime);

        if let Some(max_wait) = self.max_wait {
            options = options.acquire_timeout(max_wait);
        }

        if !self.connection_init_sqls.is_empty() {
            let init_sqls = self.connection_init_sqls.clone();
            options = options.after_connect(move |conn, _meta| {
                let init_sqls = init_sqls.clone();
                Box::pin(async move {
                    for sql in &init_sqls {
                        conn.execute(sql.as_str()).await?;
                    }
                    Ok(())
                })
            });
        }

        options
    }

    /// Builds connection options from the URL, credentials and driver
    /// connection properties.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] without a URL, or a database
    /// error if the backend rejects the URL.
    pub fn connect_options(&self) -> ConfigResult<PgConnectOptions> {
        let url = self.url.as_deref().ok_or_else(|| ConfigError::MissingField {
            field: "url".to_string(),
        })?;
        let mut options = PgConnectOptions::from_str(url)?;
        if let Some(username) = &self.username {
            options = options.username(username);
        }
        if let Some(password) = &self.password {
            options = options.password(password);
        }
        if !self.connection_properties.is_empty() {
            options = options.options(
                self.connection_properties
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            );
        }
        Ok(options)
    }

    /// Validates the configuration, then connects a pool with it.
    ///
    /// # Errors
    ///
    /// Returns validation errors before any connection attempt, or a
    /// database error if the backend cannot connect.
    pub async fn create_pool(&self) -> ConfigResult<PgPool> {
        self.validate()?;
        let connect = self.connect_options()?;
        let pool = self.pool_options().connect_with(connect).await?;
        tracing::debug!(
            data_source = %self.safe_connection_string(),
            "connection pool created"
        );
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_max_connections_uses_max_total_when_positive() {
        let mut config = DataSourceConfig::default();
        config.max_total = 12;
        assert_eq!(config.effective_max_connections(), 12);
    }

    #[test]
    fn test_negative_max_total_means_unbounded() {
        let mut config = DataSourceConfig::default();
        config.max_total = -1;
        assert_eq!(config.effective_max_connections(), u32::MAX);
    }

    #[test]
    fn test_zero_max_total_means_unbounded() {
        let mut config = DataSourceConfig::default();
        config.max_total = 0;
        assert_eq!(config.effective_max_connections(), u32::MAX);
    }

    #[test]
    fn test_effective_min_connections_covers_initial_size() {
        let mut config = DataSourceConfig::default();
        config.min_idle = 2;
        config.initial_size = 5;
        assert_eq!(config.effective_min_connections(), 5);

        config.initial_size = 0;
        assert_eq!(config.effective_min_connections(), 2);
    }

    #[test]
    fn test_pool_options_reflect_bounds() {
        let mut config = DataSourceConfig::default();
        config.max_total = 20;
        config.min_idle = 3;
        let options = config.pool_options();
        assert_eq!(options.get_max_connections(), 20);
        assert_eq!(options.get_min_connections(), 3);
    }

    #[test]
    fn test_connect_options_require_url() {
        let config = DataSourceConfig::default();
        assert!(matches!(
            config.connect_options(),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_connect_options_apply_credentials() {
        let mut config = DataSourceConfig::default();
        config.url = Some("postgres://db.internal:5432/app".to_string());
        config.username = Some("app".to_string());
        config.password = Some("secret".to_string());

        let options = config.connect_options().expect("valid URL");
        assert_eq!(options.get_username(), "app");
        assert_eq!(options.get_host(), "db.internal");
    }
}
