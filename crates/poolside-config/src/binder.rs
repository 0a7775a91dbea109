//! The property binder: flat property set in, populated config out
//!
//! Binding walks the recognized keys in a fixed order and assigns every one
//! present in the supplied set. Keys the binder does not recognize are
//! simply skipped here; the [`crate::advisory`] pass is responsible for
//! telling callers about them.

use std::time::Duration;

use poolside_properties::{parse_list, parse_properties};

use crate::error::{ConfigError, ConfigResult};
use crate::{DataSourceConfig, PropertyMap, isolation, keys};

/// Binds every recognized property in `properties` onto `config`.
///
/// Fields whose keys are absent keep their current values. Boolean values
/// parse leniently (`"true"` case-insensitively; anything else is `false`).
///
/// # Errors
///
/// Returns [`ConfigError::InvalidValue`] for non-numeric integer or duration
/// text and [`ConfigError::MalformedProperty`] for a bad
/// `connectionProperties` entry. Binding stops at the first error; fields
/// bound before it stay modified, so callers should discard `config` on
/// failure.
pub fn bind(properties: &PropertyMap, config: &mut DataSourceConfig) -> ConfigResult<()> {
    set_opt_flag(
        properties,
        keys::PROP_DEFAULT_AUTO_COMMIT,
        &mut config.default_auto_commit,
    );
    set_opt_flag(
        properties,
        keys::PROP_DEFAULT_READ_ONLY,
        &mut config.default_read_only,
    );

    if let Some(value) = lookup(properties, keys::PROP_DEFAULT_TRANSACTION_ISOLATION) {
        config.default_transaction_isolation = isolation::parse_isolation_level(value);
    }

    set_string(
        properties,
        keys::PROP_DEFAULT_SCHEMA,
        &mut config.default_schema,
    );
    set_string(
        properties,
        keys::PROP_DEFAULT_CATALOG,
        &mut config.default_catalog,
    );
    set_flag(properties, keys::PROP_CACHE_STATE, &mut config.cache_state);
    set_string(
        properties,
        keys::PROP_DRIVER_CLASS_NAME,
        &mut config.driver_class_name,
    );
    set_flag(properties, keys::PROP_LIFO, &mut config.lifo);
    set_int(properties, keys::PROP_MAX_TOTAL, &mut config.max_total)?;
    set_int(properties, keys::PROP_MAX_IDLE, &mut config.max_idle)?;
    set_int(properties, keys::PROP_MIN_IDLE, &mut config.min_idle)?;
    set_int(properties, keys::PROP_INITIAL_SIZE, &mut config.initial_size)?;
    set_millis(properties, keys::PROP_MAX_WAIT_MILLIS, &mut config.max_wait)?;
    set_flag(
        properties,
        keys::PROP_TEST_ON_CREATE,
        &mut config.test_on_create,
    );
    set_flag(
        properties,
        keys::PROP_TEST_ON_BORROW,
        &mut config.test_on_borrow,
    );
    set_flag(
        properties,
        keys::PROP_TEST_ON_RETURN,
        &mut config.test_on_return,
    );
    set_millis(
        properties,
        keys::PROP_TIME_BETWEEN_EVICTION_RUNS_MILLIS,
        &mut config.time_between_eviction_runs,
    )?;
    set_int(
        properties,
        keys::PROP_NUM_TESTS_PER_EVICTION_RUN,
        &mut config.num_tests_per_eviction_run,
    )?;
    set_millis(
        properties,
        keys::PROP_MIN_EVICTABLE_IDLE_TIME_MILLIS,
        &mut config.min_evictable_idle,
    )?;
    set_millis(
        properties,
        keys::PROP_SOFT_MIN_EVICTABLE_IDLE_TIME_MILLIS,
        &mut config.soft_min_evictable_idle,
    )?;
    set_string(
        properties,
        keys::PROP_EVICTION_POLICY_CLASS_NAME,
        &mut config.eviction_policy_class_name,
    );
    set_flag(
        properties,
        keys::PROP_TEST_WHILE_IDLE,
        &mut config.test_while_idle,
    );
    set_string(properties, keys::PROP_PASSWORD, &mut config.password);
    set_string(properties, keys::PROP_URL, &mut config.url);
    set_string(properties, keys::PROP_USER_NAME, &mut config.username);
    set_string(
        properties,
        keys::PROP_VALIDATION_QUERY,
        &mut config.validation_query,
    );
    set_secs(
        properties,
        keys::PROP_VALIDATION_QUERY_TIMEOUT,
        &mut config.validation_query_timeout,
    )?;
    set_flag(
        properties,
        keys::PROP_ACCESS_TO_UNDERLYING_CONNECTION_ALLOWED,
        &mut config.access_to_underlying_connection_allowed,
    );
    set_flag(
        properties,
        keys::PROP_REMOVE_ABANDONED_ON_BORROW,
        &mut config.remove_abandoned_on_borrow,
    );
    set_flag(
        properties,
        keys::PROP_REMOVE_ABANDONED_ON_MAINTENANCE,
        &mut config.remove_abandoned_on_maintenance,
    );
    set_secs(
        properties,
        keys::PROP_REMOVE_ABANDONED_TIMEOUT,
        &mut config.remove_abandoned_timeout,
    )?;
    set_flag(
        properties,
        keys::PROP_LOG_ABANDONED,
        &mut config.log_abandoned,
    );
    set_flag(
        properties,
        keys::PROP_ABANDONED_USAGE_TRACKING,
        &mut config.abandoned_usage_tracking,
    );
    set_flag(
        properties,
        keys::PROP_POOL_PREPARED_STATEMENTS,
        &mut config.pool_prepared_statements,
    );
    set_flag(
        properties,
        keys::PROP_CLEAR_STATEMENT_POOL_ON_RETURN,
        &mut config.clear_statement_pool_on_return,
    );
    set_int(
        properties,
        keys::PROP_MAX_OPEN_PREPARED_STATEMENTS,
        &mut config.max_open_prepared_statements,
    )?;

    if let Some(value) = lookup(properties, keys::PROP_CONNECTION_INIT_SQLS) {
        config.connection_init_sqls = parse_list(value, ';');
    }

    if let Some(value) = lookup(properties, keys::PROP_CONNECTION_PROPERTIES) {
        for (name, property_value) in parse_properties(value)? {
            config.add_connection_property(name, property_value);
        }
    }

    set_millis(
        properties,
        keys::PROP_MAX_CONN_LIFETIME_MILLIS,
        &mut config.max_conn_lifetime,
    )?;
    set_flag(
        properties,
        keys::PROP_LOG_EXPIRED_CONNECTIONS,
        &mut config.log_expired_connections,
    );
    set_flag(
        properties,
        keys::PROP_ENABLE_AUTO_COMMIT_ON_RETURN,
        &mut config.auto_commit_on_return,
    );
    set_flag(
        properties,
        keys::PROP_ROLLBACK_ON_RETURN,
        &mut config.rollback_on_return,
    );
    set_secs(
        properties,
        keys::PROP_DEFAULT_QUERY_TIMEOUT,
        &mut config.default_query_timeout,
    )?;
    set_flag(
        properties,
        keys::PROP_FAST_FAIL_VALIDATION,
        &mut config.fast_fail_validation,
    );

    if let Some(value) = lookup(properties, keys::PROP_DISCONNECTION_SQL_CODES) {
        config.disconnection_sql_codes = parse_list(value, ',');
    }
    if let Some(value) = lookup(properties, keys::PROP_DISCONNECTION_IGNORE_SQL_CODES) {
        config.disconnection_ignore_sql_codes = parse_list(value, ',');
    }

    set_string(
        properties,
        keys::PROP_CONNECTION_FACTORY_CLASS_NAME,
        &mut config.connection_factory_class_name,
    );

    Ok(())
}

fn lookup<'a>(properties: &'a PropertyMap, key: &str) -> Option<&'a str> {
    properties.get(key).map(String::as_str)
}

/// Lenient boolean convention: `"true"` case-insensitively is `true`,
/// anything else is `false`. Never an error.
pub(crate) fn parse_flag(value: &str) -> bool {
    value.eq_ignore_ascii_case("true")
}

pub(crate) fn parse_int(key: &str, value: &str) -> ConfigResult<i32> {
    value
        .parse::<i32>()
        .map_err(|_| invalid(key, value, "an integer"))
}

// Negative durations mean "disabled" and map to `None`.
pub(crate) fn parse_millis(key: &str, value: &str) -> ConfigResult<Option<Duration>> {
    let millis = value
        .parse::<i64>()
        .map_err(|_| invalid(key, value, "a millisecond count"))?;
    Ok(u64::try_from(millis).ok().map(Duration::from_millis))
}

pub(crate) fn parse_secs(key: &str, value: &str) -> ConfigResult<Option<Duration>> {
    let secs = value
        .parse::<i64>()
        .map_err(|_| invalid(key, value, "a second count"))?;
    Ok(u64::try_from(secs).ok().map(Duration::from_secs))
}

fn set_flag(properties: &PropertyMap, key: &str, slot: &mut bool) {
    if let Some(value) = lookup(properties, key) {
        *slot = parse_flag(value);
    }
}

fn set_opt_flag(properties: &PropertyMap, key: &str, slot: &mut Option<bool>) {
    if let Some(value) = lookup(properties, key) {
        *slot = Some(parse_flag(value));
    }
}

fn set_string(properties: &PropertyMap, key: &str, slot: &mut Option<String>) {
    if let Some(value) = lookup(properties, key) {
        *slot = Some(value.to_string());
    }
}

fn set_int(properties: &PropertyMap, key: &str, slot: &mut i32) -> ConfigResult<()> {
    if let Some(value) = lookup(properties, key) {
        *slot = parse_int(key, value)?;
    }
    Ok(())
}

fn set_millis(
    properties: &PropertyMap,
    key: &str,
    slot: &mut Option<Duration>,
) -> ConfigResult<()> {
    if let Some(value) = lookup(properties, key) {
        *slot = parse_millis(key, value)?;
    }
    Ok(())
}

fn set_secs(properties: &PropertyMap, key: &str, slot: &mut Option<Duration>) -> ConfigResult<()> {
    if let Some(value) = lookup(properties, key) {
        *slot = parse_secs(key, value)?;
    }
    Ok(())
}

fn invalid(key: &str, value: &str, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> PropertyMap {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_absent_keys_leave_fields_at_defaults() {
        let config = DataSourceConfig::from_properties(&props(&[("maxTotal", "20")]))
            .expect("valid properties");
        assert_eq!(config.max_total, 20);
        // Everything else stays at its default
        assert_eq!(config.max_idle, crate::DEFAULT_MAX_IDLE);
        assert_eq!(config.min_idle, crate::DEFAULT_MIN_IDLE);
        assert!(config.url.is_none());
        assert!(config.test_on_borrow);
        assert!(config.connection_init_sqls.is_empty());
    }

    #[test]
    fn test_empty_property_set_is_a_no_op() {
        let mut config = DataSourceConfig::default();
        config.apply_properties(&PropertyMap::new()).expect("empty set binds");
        assert_eq!(config, DataSourceConfig::default());
    }

    #[test]
    fn test_string_fields_bind_verbatim() {
        let config = DataSourceConfig::from_properties(&props(&[
            ("url", "postgres://db.internal/app"),
            ("username", "app"),
            ("password", "secret"),
            ("validationQuery", "SELECT 1"),
            ("defaultCatalog", "main"),
            ("defaultSchema", "public"),
        ]))
        .expect("valid properties");
        assert_eq!(config.url.as_deref(), Some("postgres://db.internal/app"));
        assert_eq!(config.username.as_deref(), Some("app"));
        assert_eq!(config.password.as_deref(), Some("secret"));
        assert_eq!(config.validation_query.as_deref(), Some("SELECT 1"));
        assert_eq!(config.default_catalog.as_deref(), Some("main"));
        assert_eq!(config.default_schema.as_deref(), Some("public"));
    }

    #[test]
    fn test_boolean_parsing_is_lenient() {
        let config = DataSourceConfig::from_properties(&props(&[
            ("testOnBorrow", "notabool"),
            ("testOnReturn", "TRUE"),
            ("lifo", "True"),
            ("cacheState", "1"),
        ]))
        .expect("bad booleans never error");
        assert!(!config.test_on_borrow);
        assert!(config.test_on_return);
        assert!(config.lifo);
        assert!(!config.cache_state);
    }

    #[test]
    fn test_optional_booleans_bind_to_some() {
        let config =
            DataSourceConfig::from_properties(&props(&[("defaultAutoCommit", "false")]))
                .expect("valid properties");
        assert_eq!(config.default_auto_commit, Some(false));
        assert_eq!(config.default_read_only, None);
    }

    #[test]
    fn test_integer_garbage_aborts_binding() {
        let err = DataSourceConfig::from_properties(&props(&[("maxTotal", "lots")]))
            .expect_err("non-numeric integer");
        match err {
            ConfigError::InvalidValue { key, value, .. } => {
                assert_eq!(key, "maxTotal");
                assert_eq!(value, "lots");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_duration_garbage_aborts_binding() {
        assert!(
            DataSourceConfig::from_properties(&props(&[("maxWaitMillis", "soon")])).is_err()
        );
        assert!(
            DataSourceConfig::from_properties(&props(&[("validationQueryTimeout", "3s")]))
                .is_err()
        );
    }

    #[test]
    fn test_durations_bind_in_their_declared_units() {
        let config = DataSourceConfig::from_properties(&props(&[
            ("maxWaitMillis", "10000"),
            ("validationQueryTimeout", "5"),
            ("maxConnLifetimeMillis", "60000"),
        ]))
        .expect("valid properties");
        assert_eq!(config.max_wait, Some(Duration::from_millis(10_000)));
        assert_eq!(config.validation_query_timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.max_conn_lifetime, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_negative_durations_disable_the_field() {
        let config = DataSourceConfig::from_properties(&props(&[
            ("maxWaitMillis", "-1"),
            ("minEvictableIdleTimeMillis", "-1"),
        ]))
        .expect("valid properties");
        assert_eq!(config.max_wait, None);
        assert_eq!(config.min_evictable_idle, None);
    }

    #[test]
    fn test_transaction_isolation_special_case() {
        let symbolic =
            DataSourceConfig::from_properties(&props(&[("defaultTransactionIsolation", "READ_COMMITTED")]))
                .expect("symbolic level");
        assert_eq!(
            symbolic.default_transaction_isolation,
            isolation::TRANSACTION_READ_COMMITTED
        );

        let numeric =
            DataSourceConfig::from_properties(&props(&[("defaultTransactionIsolation", "4")]))
                .expect("numeric level");
        assert_eq!(numeric.default_transaction_isolation, 4);

        let bogus =
            DataSourceConfig::from_properties(&props(&[("defaultTransactionIsolation", "bogus")]))
                .expect("unknown level recovers locally");
        assert_eq!(
            bogus.default_transaction_isolation,
            isolation::ISOLATION_UNKNOWN
        );
    }

    #[test]
    fn test_connection_init_sqls_split_on_semicolons() {
        let config = DataSourceConfig::from_properties(&props(&[(
            "connectionInitSqls",
            "SET ROLE app;SET TIME ZONE 'UTC'",
        )]))
        .expect("valid properties");
        assert_eq!(
            config.connection_init_sqls,
            vec!["SET ROLE app", "SET TIME ZONE 'UTC'"]
        );
    }

    #[test]
    fn test_disconnection_code_lists_split_on_commas() {
        let config = DataSourceConfig::from_properties(&props(&[
            ("disconnectionSqlCodes", "57P01,57P02"),
            ("disconnectionIgnoreSqlCodes", "08003,08004"),
        ]))
        .expect("valid properties");
        assert_eq!(config.disconnection_sql_codes, vec!["57P01", "57P02"]);
        assert_eq!(config.disconnection_ignore_sql_codes, vec!["08003", "08004"]);
    }

    #[test]
    fn test_connection_properties_block_binds_each_pair() {
        let config = DataSourceConfig::from_properties(&props(&[(
            "connectionProperties",
            "ssl=true;loginTimeout=10",
        )]))
        .expect("valid properties");
        assert_eq!(
            config.connection_properties.get("ssl").map(String::as_str),
            Some("true")
        );
        assert_eq!(
            config.connection_properties.get("loginTimeout").map(String::as_str),
            Some("10")
        );
    }

    #[test]
    fn test_malformed_connection_properties_abort_binding() {
        let err = DataSourceConfig::from_properties(&props(&[(
            "connectionProperties",
            "ssl=true;bad",
        )]))
        .expect_err("malformed block");
        assert!(err.to_string().contains("'bad'"));
    }

    #[test]
    fn test_legacy_keys_are_not_bound() {
        let config = DataSourceConfig::from_properties(&props(&[("maxWait", "500")]))
            .expect("legacy keys are ignored by the binder");
        assert_eq!(config.max_wait, None);
    }

    #[test]
    fn test_partial_application_layers_over_existing_values() {
        let mut config = DataSourceConfig::from_properties(&props(&[("maxTotal", "20")]))
            .expect("first layer");
        config
            .apply_properties(&props(&[("minIdle", "2")]))
            .expect("second layer");
        assert_eq!(config.max_total, 20);
        assert_eq!(config.min_idle, 2);
    }
}
