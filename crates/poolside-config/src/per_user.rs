//! Per-user pool overrides
//!
//! A deployment serving several database accounts from one pool definition
//! can layer user-specific limits and connection defaults on top of a shared
//! base configuration. Three scalar keys (`defaultMaxTotal`, `defaultMaxIdle`,
//! `defaultMaxWaitMillis`) set pool-wide fallbacks; the `perUser*` keys carry
//! username-keyed override maps, transported as the same `key=value` block
//! format `connectionProperties` uses. [`PerUserConfig::config_for_user`]
//! resolves the layering for one username.

use std::collections::BTreeMap;
use std::time::Duration;

use poolside_properties::parse_properties;
use serde::{Deserialize, Serialize};

use crate::binder::{parse_flag, parse_int, parse_millis};
use crate::error::ConfigResult;
use crate::reference::Reference;
use crate::{DEFAULT_MAX_IDLE, DEFAULT_MAX_TOTAL, DataSourceConfig, PropertyMap, isolation};

/// Class name a reference must carry to be treated as a per-user data source
pub const PER_USER_DATA_SOURCE_CLASS_NAME: &str = "PerUserDataSource";

pub const PROP_DEFAULT_MAX_TOTAL: &str = "defaultMaxTotal";
pub const PROP_DEFAULT_MAX_IDLE: &str = "defaultMaxIdle";
pub const PROP_DEFAULT_MAX_WAIT_MILLIS: &str = "defaultMaxWaitMillis";
pub const PROP_PER_USER_DEFAULT_AUTO_COMMIT: &str = "perUserDefaultAutoCommit";
pub const PROP_PER_USER_DEFAULT_READ_ONLY: &str = "perUserDefaultReadOnly";
pub const PROP_PER_USER_DEFAULT_TRANSACTION_ISOLATION: &str = "perUserDefaultTransactionIsolation";
pub const PROP_PER_USER_MAX_TOTAL: &str = "perUserMaxTotal";
pub const PROP_PER_USER_MAX_IDLE: &str = "perUserMaxIdle";
pub const PROP_PER_USER_MAX_WAIT_MILLIS: &str = "perUserMaxWaitMillis";

/// Pool-wide defaults plus username-keyed overrides.
///
/// Scalar defaults apply to every user without an entry in the matching map.
/// Map entries override the default for that username only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerUserConfig {
    /// Connection ceiling for users without a `perUserMaxTotal` entry
    pub default_max_total: i32,

    /// Idle ceiling for users without a `perUserMaxIdle` entry
    pub default_max_idle: i32,

    /// Borrow wait for users without a `perUserMaxWaitMillis` entry;
    /// `None` means wait indefinitely
    pub default_max_wait: Option<Duration>,

    /// Auto-commit default per username
    pub per_user_default_auto_commit: BTreeMap<String, bool>,

    /// Read-only default per username
    pub per_user_default_read_only: BTreeMap<String, bool>,

    /// Transaction isolation level per username
    pub per_user_default_transaction_isolation: BTreeMap<String, i32>,

    /// Connection ceiling per username
    pub per_user_max_total: BTreeMap<String, i32>,

    /// Idle ceiling per username
    pub per_user_max_idle: BTreeMap<String, i32>,

    /// Borrow wait per username; `None` means wait indefinitely
    pub per_user_max_wait: BTreeMap<String, Option<Duration>>,
}

impl Default for PerUserConfig {
    fn default() -> Self {
        Self {
            default_max_total: DEFAULT_MAX_TOTAL,
            default_max_idle: DEFAULT_MAX_IDLE,
            default_max_wait: None,
            per_user_default_auto_commit: BTreeMap::new(),
            per_user_default_read_only: BTreeMap::new(),
            per_user_default_transaction_isolation: BTreeMap::new(),
            per_user_max_total: BTreeMap::new(),
            per_user_max_idle: BTreeMap::new(),
            per_user_max_wait: BTreeMap::new(),
        }
    }
}

impl PerUserConfig {
    /// Builds a fresh per-user configuration from a flat property set.
    ///
    /// # Errors
    ///
    /// See [`PerUserConfig::apply_properties`].
    pub fn from_properties(properties: &PropertyMap) -> ConfigResult<Self> {
        let mut config = Self::default();
        config.apply_properties(properties)?;
        Ok(config)
    }

    /// Binds every recognized per-user property in `properties` onto `self`.
    ///
    /// Keys absent from the set leave their fields untouched. Unrecognized
    /// keys are skipped without comment. The map-valued keys carry
    /// `username=value` blocks; value parsing follows the binder's
    /// conventions, with errors reported under the map's property name.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ConfigError::InvalidValue`] for non-numeric
    /// integer or millisecond text and
    /// [`crate::error::ConfigError::MalformedProperty`] for a bad block
    /// entry. Binding stops at the first error.
    pub fn apply_properties(&mut self, properties: &PropertyMap) -> ConfigResult<()> {
        if let Some(value) = properties.get(PROP_DEFAULT_MAX_TOTAL) {
            self.default_max_total = parse_int(PROP_DEFAULT_MAX_TOTAL, value)?;
        }
        if let Some(value) = properties.get(PROP_DEFAULT_MAX_IDLE) {
            self.default_max_idle = parse_int(PROP_DEFAULT_MAX_IDLE, value)?;
        }
        if let Some(value) = properties.get(PROP_DEFAULT_MAX_WAIT_MILLIS) {
            self.default_max_wait = parse_millis(PROP_DEFAULT_MAX_WAIT_MILLIS, value)?;
        }

        if let Some(value) = properties.get(PROP_PER_USER_DEFAULT_AUTO_COMMIT) {
            for (user, flag) in parse_properties(value)? {
                self.per_user_default_auto_commit
                    .insert(user, parse_flag(&flag));
            }
        }
        if let Some(value) = properties.get(PROP_PER_USER_DEFAULT_READ_ONLY) {
            for (user, flag) in parse_properties(value)? {
                self.per_user_default_read_only
                    .insert(user, parse_flag(&flag));
            }
        }
        if let Some(value) = properties.get(PROP_PER_USER_DEFAULT_TRANSACTION_ISOLATION) {
            for (user, level) in parse_properties(value)? {
                self.per_user_default_transaction_isolation
                    .insert(user, isolation::parse_isolation_level(&level));
            }
        }
        if let Some(value) = properties.get(PROP_PER_USER_MAX_TOTAL) {
            for (user, count) in parse_properties(value)? {
                let count = parse_int(PROP_PER_USER_MAX_TOTAL, &count)?;
                self.per_user_max_total.insert(user, count);
            }
        }
        if let Some(value) = properties.get(PROP_PER_USER_MAX_IDLE) {
            for (user, count) in parse_properties(value)? {
                let count = parse_int(PROP_PER_USER_MAX_IDLE, &count)?;
                self.per_user_max_idle.insert(user, count);
            }
        }
        if let Some(value) = properties.get(PROP_PER_USER_MAX_WAIT_MILLIS) {
            for (user, wait) in parse_properties(value)? {
                let wait = parse_millis(PROP_PER_USER_MAX_WAIT_MILLIS, &wait)?;
                self.per_user_max_wait.insert(user, wait);
            }
        }

        Ok(())
    }

    /// Resolves the effective configuration for one username.
    ///
    /// Starts from `base`, applies the pool-wide defaults, then overlays any
    /// entries the override maps hold for `username`, and finally pins the
    /// configuration's username to the given one.
    #[must_use]
    pub fn config_for_user(&self, base: &DataSourceConfig, username: &str) -> DataSourceConfig {
        let mut config = base.clone();

        config.max_total = self.default_max_total;
        config.max_idle = self.default_max_idle;
        config.max_wait = self.default_max_wait;

        if let Some(&flag) = self.per_user_default_auto_commit.get(username) {
            config.default_auto_commit = Some(flag);
        }
        if let Some(&flag) = self.per_user_default_read_only.get(username) {
            config.default_read_only = Some(flag);
        }
        if let Some(&level) = self.per_user_default_transaction_isolation.get(username) {
            config.default_transaction_isolation = level;
        }
        if let Some(&count) = self.per_user_max_total.get(username) {
            config.max_total = count;
        }
        if let Some(&count) = self.per_user_max_idle.get(username) {
            config.max_idle = count;
        }
        if let Some(&wait) = self.per_user_max_wait.get(username) {
            config.max_wait = wait;
        }

        config.username = Some(username.to_string());
        config
    }
}

/// Builds a [`PerUserConfig`] from a naming-service reference.
///
/// Returns `Ok(None)` when the record's class name is not
/// [`PER_USER_DATA_SOURCE_CLASS_NAME`]. Attributes the per-user binder does
/// not recognize are skipped without comment; this record type shares its
/// attribute space with other factories.
///
/// # Errors
///
/// Returns the first binding error; see [`PerUserConfig::apply_properties`].
pub fn per_user_from_reference(reference: &Reference) -> ConfigResult<Option<PerUserConfig>> {
    if reference.class_name != PER_USER_DATA_SOURCE_CLASS_NAME {
        return Ok(None);
    }
    PerUserConfig::from_properties(&reference.to_property_map()).map(Some)
}
