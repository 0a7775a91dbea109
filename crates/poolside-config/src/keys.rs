//! Property key names and the static lookup tables built from them
//!
//! Key names use the camelCase spelling callers supply in resource
//! definitions and property files; the tables are read-only after first use.

use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::{DEFAULT_MAX_TOTAL, DEFAULT_REMOVE_ABANDONED_ON_BORROW};

pub const PROP_DEFAULT_AUTO_COMMIT: &str = "defaultAutoCommit";
pub const PROP_DEFAULT_READ_ONLY: &str = "defaultReadOnly";
pub const PROP_DEFAULT_TRANSACTION_ISOLATION: &str = "defaultTransactionIsolation";
pub const PROP_DEFAULT_CATALOG: &str = "defaultCatalog";
pub const PROP_DEFAULT_SCHEMA: &str = "defaultSchema";
pub const PROP_CACHE_STATE: &str = "cacheState";
pub const PROP_DRIVER_CLASS_NAME: &str = "driverClassName";
pub const PROP_LIFO: &str = "lifo";
pub const PROP_MAX_TOTAL: &str = "maxTotal";
pub const PROP_MAX_IDLE: &str = "maxIdle";
pub const PROP_MIN_IDLE: &str = "minIdle";
pub const PROP_INITIAL_SIZE: &str = "initialSize";
pub const PROP_MAX_WAIT_MILLIS: &str = "maxWaitMillis";
pub const PROP_TEST_ON_CREATE: &str = "testOnCreate";
pub const PROP_TEST_ON_BORROW: &str = "testOnBorrow";
pub const PROP_TEST_ON_RETURN: &str = "testOnReturn";
pub const PROP_TIME_BETWEEN_EVICTION_RUNS_MILLIS: &str = "timeBetweenEvictionRunsMillis";
pub const PROP_NUM_TESTS_PER_EVICTION_RUN: &str = "numTestsPerEvictionRun";
pub const PROP_MIN_EVICTABLE_IDLE_TIME_MILLIS: &str = "minEvictableIdleTimeMillis";
pub const PROP_SOFT_MIN_EVICTABLE_IDLE_TIME_MILLIS: &str = "softMinEvictableIdleTimeMillis";
pub const PROP_EVICTION_POLICY_CLASS_NAME: &str = "evictionPolicyClassName";
pub const PROP_TEST_WHILE_IDLE: &str = "testWhileIdle";
pub const PROP_PASSWORD: &str = "password";
pub const PROP_URL: &str = "url";
pub const PROP_USER_NAME: &str = "username";
pub const PROP_VALIDATION_QUERY: &str = "validationQuery";
pub const PROP_VALIDATION_QUERY_TIMEOUT: &str = "validationQueryTimeout";
pub const PROP_CONNECTION_FACTORY_CLASS_NAME: &str = "connectionFactoryClassName";

/// The associated value must be of the form `[query;]*`
pub const PROP_CONNECTION_INIT_SQLS: &str = "connectionInitSqls";
pub const PROP_ACCESS_TO_UNDERLYING_CONNECTION_ALLOWED: &str =
    "accessToUnderlyingConnectionAllowed";
pub const PROP_REMOVE_ABANDONED_ON_BORROW: &str = "removeAbandonedOnBorrow";
pub const PROP_REMOVE_ABANDONED_ON_MAINTENANCE: &str = "removeAbandonedOnMaintenance";
pub const PROP_REMOVE_ABANDONED_TIMEOUT: &str = "removeAbandonedTimeout";
pub const PROP_LOG_ABANDONED: &str = "logAbandoned";
pub const PROP_ABANDONED_USAGE_TRACKING: &str = "abandonedUsageTracking";
pub const PROP_POOL_PREPARED_STATEMENTS: &str = "poolPreparedStatements";
pub const PROP_CLEAR_STATEMENT_POOL_ON_RETURN: &str = "clearStatementPoolOnReturn";
pub const PROP_MAX_OPEN_PREPARED_STATEMENTS: &str = "maxOpenPreparedStatements";

/// The associated value must be of the form `[name=value;]*`
pub const PROP_CONNECTION_PROPERTIES: &str = "connectionProperties";
pub const PROP_MAX_CONN_LIFETIME_MILLIS: &str = "maxConnLifetimeMillis";
pub const PROP_LOG_EXPIRED_CONNECTIONS: &str = "logExpiredConnections";
pub const PROP_ROLLBACK_ON_RETURN: &str = "rollbackOnReturn";
pub const PROP_ENABLE_AUTO_COMMIT_ON_RETURN: &str = "enableAutoCommitOnReturn";
pub const PROP_DEFAULT_QUERY_TIMEOUT: &str = "defaultQueryTimeout";
pub const PROP_FAST_FAIL_VALIDATION: &str = "fastFailValidation";

/// The associated value must be of the form `[STATE_CODE,]*`
pub const PROP_DISCONNECTION_SQL_CODES: &str = "disconnectionSqlCodes";

/// SQL-state codes excluded from fatal-disconnection checks, comma-separated
/// with no spaces (for example `"08003,08004"`)
pub const PROP_DISCONNECTION_IGNORE_SQL_CODES: &str = "disconnectionIgnoreSqlCodes";

// Obsolete first-generation property names. These are never bound; they only
// produce migration warnings in the advisory pass.
pub const LEGACY_PROP_MAX_ACTIVE: &str = "maxActive";
pub const LEGACY_PROP_REMOVE_ABANDONED: &str = "removeAbandoned";
pub const LEGACY_PROP_MAX_WAIT: &str = "maxWait";

// Properties expected to appear in resource definitions for the surrounding
// lookup machinery. Irrelevant to the binder, so never reported as ignored.
pub const SILENT_PROP_FACTORY: &str = "factory";
pub const SILENT_PROP_SCOPE: &str = "scope";
pub const SILENT_PROP_SINGLETON: &str = "singleton";
pub const SILENT_PROP_AUTH: &str = "auth";

/// Every property name the binder recognizes, in declaration order (the
/// binder applies its own fixed order; see [`crate::binder::bind`])
pub static ALL_PROPERTY_NAMES: &[&str] = &[
    PROP_DEFAULT_AUTO_COMMIT,
    PROP_DEFAULT_READ_ONLY,
    PROP_DEFAULT_TRANSACTION_ISOLATION,
    PROP_DEFAULT_CATALOG,
    PROP_DEFAULT_SCHEMA,
    PROP_CACHE_STATE,
    PROP_DRIVER_CLASS_NAME,
    PROP_LIFO,
    PROP_MAX_TOTAL,
    PROP_MAX_IDLE,
    PROP_MIN_IDLE,
    PROP_INITIAL_SIZE,
    PROP_MAX_WAIT_MILLIS,
    PROP_TEST_ON_CREATE,
    PROP_TEST_ON_BORROW,
    PROP_TEST_ON_RETURN,
    PROP_TIME_BETWEEN_EVICTION_RUNS_MILLIS,
    PROP_NUM_TESTS_PER_EVICTION_RUN,
    PROP_MIN_EVICTABLE_IDLE_TIME_MILLIS,
    PROP_SOFT_MIN_EVICTABLE_IDLE_TIME_MILLIS,
    PROP_EVICTION_POLICY_CLASS_NAME,
    PROP_TEST_WHILE_IDLE,
    PROP_PASSWORD,
    PROP_URL,
    PROP_USER_NAME,
    PROP_VALIDATION_QUERY,
    PROP_VALIDATION_QUERY_TIMEOUT,
    PROP_CONNECTION_INIT_SQLS,
    PROP_ACCESS_TO_UNDERLYING_CONNECTION_ALLOWED,
    PROP_REMOVE_ABANDONED_ON_BORROW,
    PROP_REMOVE_ABANDONED_ON_MAINTENANCE,
    PROP_REMOVE_ABANDONED_TIMEOUT,
    PROP_LOG_ABANDONED,
    PROP_ABANDONED_USAGE_TRACKING,
    PROP_POOL_PREPARED_STATEMENTS,
    PROP_CLEAR_STATEMENT_POOL_ON_RETURN,
    PROP_MAX_OPEN_PREPARED_STATEMENTS,
    PROP_CONNECTION_PROPERTIES,
    PROP_MAX_CONN_LIFETIME_MILLIS,
    PROP_LOG_EXPIRED_CONNECTIONS,
    PROP_ROLLBACK_ON_RETURN,
    PROP_ENABLE_AUTO_COMMIT_ON_RETURN,
    PROP_DEFAULT_QUERY_TIMEOUT,
    PROP_FAST_FAIL_VALIDATION,
    PROP_DISCONNECTION_SQL_CODES,
    PROP_DISCONNECTION_IGNORE_SQL_CODES,
    PROP_CONNECTION_FACTORY_CLASS_NAME,
];

/// Membership set over [`ALL_PROPERTY_NAMES`] for the advisory pass
pub static KNOWN_PROPERTY_NAMES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ALL_PROPERTY_NAMES.iter().copied().collect());

/// Obsolete property names with migration warnings suggesting current ones.
/// Declaration order here is the order warnings are emitted in.
pub static LEGACY_PROPERTY_WARNINGS: Lazy<Vec<(&'static str, String)>> = Lazy::new(|| {
    vec![
        (
            LEGACY_PROP_MAX_ACTIVE,
            format!(
                "Property {LEGACY_PROP_MAX_ACTIVE} is obsolete, use {PROP_MAX_TOTAL} instead. \
                 {PROP_MAX_TOTAL} default value is {DEFAULT_MAX_TOTAL}."
            ),
        ),
        (
            LEGACY_PROP_REMOVE_ABANDONED,
            format!(
                "Property {LEGACY_PROP_REMOVE_ABANDONED} is obsolete, use one or both of \
                 {PROP_REMOVE_ABANDONED_ON_BORROW} or {PROP_REMOVE_ABANDONED_ON_MAINTENANCE} \
                 instead. Both have default value set to {DEFAULT_REMOVE_ABANDONED_ON_BORROW}."
            ),
        ),
        (
            LEGACY_PROP_MAX_WAIT,
            format!(
                "Property {LEGACY_PROP_MAX_WAIT} is obsolete, use {PROP_MAX_WAIT_MILLIS} \
                 instead. {PROP_MAX_WAIT_MILLIS} is unset by default, meaning acquisition \
                 waits indefinitely."
            ),
        ),
    ]
});

/// Properties that may appear in resource definitions but are never reported
pub static SILENT_PROPERTIES: &[&str] = &[
    SILENT_PROP_FACTORY,
    SILENT_PROP_SCOPE,
    SILENT_PROP_SINGLETON,
    SILENT_PROP_AUTH,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_set_covers_declared_names() {
        assert_eq!(KNOWN_PROPERTY_NAMES.len(), ALL_PROPERTY_NAMES.len());
        assert!(KNOWN_PROPERTY_NAMES.contains(PROP_URL));
        assert!(KNOWN_PROPERTY_NAMES.contains(PROP_DISCONNECTION_IGNORE_SQL_CODES));
    }

    #[test]
    fn test_legacy_names_are_not_known() {
        for (key, _) in LEGACY_PROPERTY_WARNINGS.iter() {
            assert!(!KNOWN_PROPERTY_NAMES.contains(key), "{key} must stay legacy");
        }
    }

    #[test]
    fn test_silent_names_are_not_known() {
        for key in SILENT_PROPERTIES {
            assert!(!KNOWN_PROPERTY_NAMES.contains(key), "{key} must stay silent");
        }
    }
}
