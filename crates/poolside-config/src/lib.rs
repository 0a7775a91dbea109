//! Data-source configuration binding for poolside
//!
//! This crate reads a flat string-keyed property set ("properties" in the
//! resource-definition sense, not Cargo's) and uses it to populate a
//! [`DataSourceConfig`], the typed description of a database connection
//! pool. The pool itself lives in the external backend (`sqlx`); this crate
//! only maps and parses configuration, then hands the result over.
//!
//! Configuration follows a simple hierarchy:
//! 1. Safe defaults (defined as constants)
//! 2. Flat property overrides, bound key by key
//! 3. Runtime validation before a pool is built

pub mod advisory;
pub mod binder;
pub mod error;
pub mod isolation;
pub mod keys;
pub mod per_user;
pub mod pool;
pub mod reference;
pub mod source;
pub mod validation;

use std::collections::BTreeMap;
use std::time::Duration;

pub use error::{ConfigError, ConfigResult};

/// Flat string-keyed property set supplied by the caller.
///
/// A `BTreeMap` keeps key iteration deterministic, which the advisory pass
/// relies on for stable unrecognized-key notices.
pub type PropertyMap = BTreeMap<String, String>;

// =============================================================================
// SAFE DEFAULTS - match the classic data-source pool defaults
// =============================================================================

pub const DEFAULT_MAX_TOTAL: i32 = 8;
pub const DEFAULT_MAX_IDLE: i32 = 8;
pub const DEFAULT_MIN_IDLE: i32 = 0;
pub const DEFAULT_INITIAL_SIZE: i32 = 0;
pub const DEFAULT_NUM_TESTS_PER_EVICTION_RUN: i32 = 3;
pub const DEFAULT_MAX_OPEN_PREPARED_STATEMENTS: i32 = -1; // Unlimited

pub const DEFAULT_LIFO: bool = true;
pub const DEFAULT_CACHE_STATE: bool = true;
pub const DEFAULT_TEST_ON_CREATE: bool = false;
pub const DEFAULT_TEST_ON_BORROW: bool = true;
pub const DEFAULT_TEST_ON_RETURN: bool = false;
pub const DEFAULT_TEST_WHILE_IDLE: bool = false;
pub const DEFAULT_REMOVE_ABANDONED_ON_BORROW: bool = false;
pub const DEFAULT_REMOVE_ABANDONED_ON_MAINTENANCE: bool = false;
pub const DEFAULT_LOG_ABANDONED: bool = false;
pub const DEFAULT_ABANDONED_USAGE_TRACKING: bool = false;
pub const DEFAULT_POOL_PREPARED_STATEMENTS: bool = false;
pub const DEFAULT_CLEAR_STATEMENT_POOL_ON_RETURN: bool = false;
pub const DEFAULT_LOG_EXPIRED_CONNECTIONS: bool = true;
pub const DEFAULT_ROLLBACK_ON_RETURN: bool = true;
pub const DEFAULT_AUTO_COMMIT_ON_RETURN: bool = true;
pub const DEFAULT_FAST_FAIL_VALIDATION: bool = false;
pub const DEFAULT_ACCESS_TO_UNDERLYING_CONNECTION_ALLOWED: bool = false;

pub const DEFAULT_MIN_EVICTABLE_IDLE: Duration = Duration::from_secs(30 * 60);
pub const DEFAULT_REMOVE_ABANDONED_TIMEOUT: Duration = Duration::from_secs(300);

/// Typed configuration for one data source.
///
/// A freshly constructed value carries the defaults above; the binder then
/// overwrites exactly the fields whose keys are present in the supplied
/// property set. This object never owns a pool; it is handed to the `sqlx`
/// bridge in [`pool`] once fully populated.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DataSourceConfig {
    /// JDBC-style connection URL
    pub url: Option<String>,

    /// Username for authentication
    pub username: Option<String>,

    /// Password for authentication (prefer a secret store in production)
    pub password: Option<String>,

    /// Driver implementation name, carried opaquely for the backend
    pub driver_class_name: Option<String>,

    /// Connection-factory implementation name, carried opaquely
    pub connection_factory_class_name: Option<String>,

    /// Auto-commit state applied to new connections; `None` leaves the
    /// driver default untouched
    pub default_auto_commit: Option<bool>,

    /// Read-only state applied to new connections
    pub default_read_only: Option<bool>,

    /// Transaction isolation level applied to new connections; one of the
    /// [`isolation`] constants, `ISOLATION_UNKNOWN` when unset
    pub default_transaction_isolation: i32,

    /// Default catalog for new connections
    pub default_catalog: Option<String>,

    /// Default schema for new connections
    pub default_schema: Option<String>,

    /// Per-connection query timeout; `None` uses the driver default
    pub default_query_timeout: Option<Duration>,

    /// Cache read-only/auto-commit state per connection
    pub cache_state: bool,

    /// Borrow idle connections last-in-first-out
    pub lifo: bool,

    /// Maximum connections in the pool; negative means unbounded
    pub max_total: i32,

    /// Maximum idle connections retained; negative means unbounded
    pub max_idle: i32,

    /// Minimum idle connections the evictor maintains
    pub min_idle: i32,

    /// Connections created eagerly at startup
    pub initial_size: i32,

    /// How long acquisition blocks before failing; `None` waits indefinitely
    pub max_wait: Option<Duration>,

    /// Validate connections as they are created
    pub test_on_create: bool,

    /// Validate connections as they are borrowed
    pub test_on_borrow: bool,

    /// Validate connections as they are returned
    pub test_on_return: bool,

    /// Validate idle connections during eviction runs
    pub test_while_idle: bool,

    /// Interval between evictor runs; `None` disables the evictor
    pub time_between_eviction_runs: Option<Duration>,

    /// Idle connections examined per evictor run
    pub num_tests_per_eviction_run: i32,

    /// Idle time before a connection is eligible for eviction
    pub min_evictable_idle: Option<Duration>,

    /// Idle time before eviction when more than `min_idle` connections are
    /// idle; `None` disables the soft criterion
    pub soft_min_evictable_idle: Option<Duration>,

    /// Eviction-policy implementation name, carried opaquely
    pub eviction_policy_class_name: Option<String>,

    /// Maximum lifetime of a connection; `None` means unlimited
    pub max_conn_lifetime: Option<Duration>,

    /// Log connections closed because their lifetime was exceeded
    pub log_expired_connections: bool,

    /// SQL used to validate connections; `None` lets the backend ping
    pub validation_query: Option<String>,

    /// Timeout applied to the validation query
    pub validation_query_timeout: Option<Duration>,

    /// Treat a connection failing validation as fatally disconnected
    pub fast_fail_validation: bool,

    /// SQL-state codes treated as fatal disconnections
    pub disconnection_sql_codes: Vec<String>,

    /// SQL-state codes excluded from fatal-disconnection checks
    pub disconnection_ignore_sql_codes: Vec<String>,

    /// Statements executed once on every new connection
    pub connection_init_sqls: Vec<String>,

    /// Extra driver properties passed through to the backend
    pub connection_properties: BTreeMap<String, String>,

    /// Expose the raw delegate connection to callers
    pub access_to_underlying_connection_allowed: bool,

    /// Reclaim abandoned connections when the pool is exhausted on borrow
    pub remove_abandoned_on_borrow: bool,

    /// Reclaim abandoned connections during evictor maintenance
    pub remove_abandoned_on_maintenance: bool,

    /// Idle time after which a borrowed connection counts as abandoned
    pub remove_abandoned_timeout: Option<Duration>,

    /// Log a stack trace for every abandoned connection reclaimed
    pub log_abandoned: bool,

    /// Record usage locations on borrowed connections for abandonment logs
    pub abandoned_usage_tracking: bool,

    /// Pool prepared statements per connection
    pub pool_prepared_statements: bool,

    /// Clear the statement pool when a connection is returned
    pub clear_statement_pool_on_return: bool,

    /// Cap on pooled prepared statements; negative means unlimited
    pub max_open_prepared_statements: i32,

    /// Roll back dirty connections on return
    pub rollback_on_return: bool,

    /// Restore auto-commit on return
    pub auto_commit_on_return: bool,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            url: None,
            username: None,
            password: None,
            driver_class_name: None,
            connection_factory_class_name: None,
            default_auto_commit: None,
            default_read_only: None,
            default_transaction_isolation: isolation::ISOLATION_UNKNOWN,
            default_catalog: None,
            default_schema: None,
            default_query_timeout: None,
            cache_state: DEFAULT_CACHE_STATE,
            lifo: DEFAULT_LIFO,
            max_total: DEFAULT_MAX_TOTAL,
            max_idle: DEFAULT_MAX_IDLE,
            min_idle: DEFAULT_MIN_IDLE,
            initial_size: DEFAULT_INITIAL_SIZE,
            max_wait: None,
            test_on_create: DEFAULT_TEST_ON_CREATE,
            test_on_borrow: DEFAULT_TEST_ON_BORROW,
            test_on_return: DEFAULT_TEST_ON_RETURN,
            test_while_idle: DEFAULT_TEST_WHILE_IDLE,
            time_between_eviction_runs: None,
            num_tests_per_eviction_run: DEFAULT_NUM_TESTS_PER_EVICTION_RUN,
            min_evictable_idle: Some(DEFAULT_MIN_EVICTABLE_IDLE),
            soft_min_evictable_idle: None,
            eviction_policy_class_name: None,
            max_conn_lifetime: None,
            log_expired_connections: DEFAULT_LOG_EXPIRED_CONNECTIONS,
            validation_query: None,
            validation_query_timeout: None,
            fast_fail_validation: DEFAULT_FAST_FAIL_VALIDATION,
            disconnection_sql_codes: Vec::new(),
            disconnection_ignore_sql_codes: Vec::new(),
            connection_init_sqls: Vec::new(),
            connection_properties: BTreeMap::new(),
            access_to_underlying_connection_allowed:
                DEFAULT_ACCESS_TO_UNDERLYING_CONNECTION_ALLOWED,
            remove_abandoned_on_borrow: DEFAULT_REMOVE_ABANDONED_ON_BORROW,
            remove_abandoned_on_maintenance: DEFAULT_REMOVE_ABANDONED_ON_MAINTENANCE,
            remove_abandoned_timeout: Some(DEFAULT_REMOVE_ABANDONED_TIMEOUT),
            log_abandoned: DEFAULT_LOG_ABANDONED,
            abandoned_usage_tracking: DEFAULT_ABANDONED_USAGE_TRACKING,
            pool_prepared_statements: DEFAULT_POOL_PREPARED_STATEMENTS,
            clear_statement_pool_on_return: DEFAULT_CLEAR_STATEMENT_POOL_ON_RETURN,
            max_open_prepared_statements: DEFAULT_MAX_OPEN_PREPARED_STATEMENTS,
            rollback_on_return: DEFAULT_ROLLBACK_ON_RETURN,
            auto_commit_on_return: DEFAULT_AUTO_COMMIT_ON_RETURN,
        }
    }
}

impl DataSourceConfig {
    /// Builds a configuration from a flat property set, starting from
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns the first binding error; see [`binder::bind`].
    pub fn from_properties(properties: &PropertyMap) -> ConfigResult<Self> {
        let mut config = Self::default();
        binder::bind(properties, &mut config)?;
        Ok(config)
    }

    /// Applies a flat property set onto this configuration in place.
    ///
    /// Keys absent from `properties` leave their fields untouched, so this
    /// can layer partial property sets over an existing configuration.
    ///
    /// # Errors
    ///
    /// Returns the first binding error; fields bound before the failing key
    /// stay modified, so discard the value on error.
    pub fn apply_properties(&mut self, properties: &PropertyMap) -> ConfigResult<()> {
        binder::bind(properties, self)
    }

    /// Adds one driver connection property.
    pub fn add_connection_property(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) {
        self.connection_properties.insert(name.into(), value.into());
    }

    /// Connection info for logging (NO PASSWORD!)
    pub fn safe_connection_string(&self) -> String {
        format!(
            "{}@{}",
            self.username.as_deref().unwrap_or("<none>"),
            self.url.as_deref().unwrap_or("<unset>")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_documented_defaults() {
        let config = DataSourceConfig::default();
        assert_eq!(config.max_total, DEFAULT_MAX_TOTAL);
        assert_eq!(config.max_idle, DEFAULT_MAX_IDLE);
        assert_eq!(config.min_idle, DEFAULT_MIN_IDLE);
        assert!(config.test_on_borrow);
        assert!(config.lifo);
        assert!(config.max_wait.is_none());
        assert_eq!(config.min_evictable_idle, Some(DEFAULT_MIN_EVICTABLE_IDLE));
        assert_eq!(
            config.default_transaction_isolation,
            isolation::ISOLATION_UNKNOWN
        );
    }

    #[test]
    fn test_config_can_be_serialized_to_toml() {
        let config = DataSourceConfig::default();
        let toml_string = toml::to_string(&config).expect("config should serialize to TOML");
        assert!(toml_string.contains("max_total"));
        assert!(toml_string.contains("test_on_borrow"));
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let mut original = DataSourceConfig::default();
        original.url = Some("postgres://localhost/app".to_string());
        original.max_total = 20;
        original
            .connection_properties
            .insert("ssl".to_string(), "true".to_string());

        let toml_string = toml::to_string(&original).expect("serialize");
        let parsed: DataSourceConfig = toml::from_str(&toml_string).expect("deserialize");
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_safe_connection_string_omits_password() {
        let mut config = DataSourceConfig::default();
        config.url = Some("postgres://localhost/app".to_string());
        config.username = Some("app".to_string());
        config.password = Some("hunter2".to_string());

        let printable = config.safe_connection_string();
        assert!(printable.contains("app@postgres://localhost/app"));
        assert!(!printable.contains("hunter2"));
    }

    #[test]
    fn test_add_connection_property() {
        let mut config = DataSourceConfig::default();
        config.add_connection_property("loginTimeout", "10");
        assert_eq!(
            config.connection_properties.get("loginTimeout").map(String::as_str),
            Some("10")
        );
    }
}
