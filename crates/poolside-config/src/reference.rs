//! Naming-service reference flattening
//!
//! A directory or naming service hands back a [`Reference`]: an ordered list
//! of named string attributes describing how to reconstruct an object. This
//! module flattens such a record into the [`PropertyMap`] the binder
//! consumes and runs the advisory pass over it, logging the results.

use crate::advisory::review_property_names;
use crate::error::ConfigResult;
use crate::{DataSourceConfig, PropertyMap};

/// Class name a reference must carry to be treated as a data source
pub const DATA_SOURCE_CLASS_NAME: &str = "DataSource";

/// One named attribute within a [`Reference`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefAddr {
    pub name: String,
    pub value: String,
}

impl RefAddr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A naming-service record: a class name plus an ordered attribute list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub class_name: String,
    pub addrs: Vec<RefAddr>,
}

impl Reference {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            addrs: Vec::new(),
        }
    }

    /// Appends one attribute, builder style.
    #[must_use]
    pub fn with_addr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.addrs.push(RefAddr::new(name, value));
        self
    }

    /// First attribute with the given name, if any.
    pub fn get(&self, name: &str) -> Option<&RefAddr> {
        self.addrs.iter().find(|addr| addr.name == name)
    }

    /// Flattens the attribute list into the binder's input shape. For
    /// duplicate attribute names the last occurrence wins.
    pub fn to_property_map(&self) -> PropertyMap {
        self.addrs
            .iter()
            .map(|addr| (addr.name.clone(), addr.value.clone()))
            .collect()
    }
}

/// Builds a [`DataSourceConfig`] from a naming-service reference.
///
/// Returns `Ok(None)` when the record's class name is not
/// [`DATA_SOURCE_CLASS_NAME`]; such records belong to some other factory.
/// Otherwise the attribute list is flattened, advisory messages about
/// obsolete or unrecognized attributes are logged, and a fresh configuration
/// is bound. `name` is the caller's label for the record, used only in
/// advisory messages.
///
/// # Errors
///
/// Returns the first binding error; see [`crate::binder::bind`].
pub fn data_source_from_reference(
    reference: &Reference,
    name: Option<&str>,
) -> ConfigResult<Option<DataSourceConfig>> {
    if reference.class_name != DATA_SOURCE_CLASS_NAME {
        return Ok(None);
    }

    let properties = reference.to_property_map();

    let advisories = review_property_names(&properties, name);
    for warning in &advisories.warnings {
        tracing::warn!("{warning}");
    }
    for notice in &advisories.notices {
        tracing::info!("{notice}");
    }

    DataSourceConfig::from_properties(&properties).map(Some)
}
