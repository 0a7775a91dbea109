//! Legacy/unknown key advisory pass
//!
//! A read-only sweep over the supplied key set that classifies every key and
//! produces the warning and notice strings callers are expected to log. It
//! never mutates the target configuration and never fails.

use crate::{PropertyMap, keys};

/// Advisory messages produced by [`review_property_names`]
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Advisories {
    /// Obsolete-key warnings, in legacy-table declaration order
    pub warnings: Vec<String>,

    /// Unrecognized-key notices, in key iteration order
    pub notices: Vec<String>,
}

impl Advisories {
    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty() && self.notices.is_empty()
    }
}

/// Classifies every key in `properties`.
///
/// Known-current and silenced keys produce nothing. Obsolete keys produce a
/// warning naming the deprecated key, its replacement and the replacement's
/// default, plus the value being ignored. Anything else produces an
/// informational notice that the key and value are ignored. `name` is an
/// optional caller-supplied resource label prefixed to every message.
pub fn review_property_names(properties: &PropertyMap, name: Option<&str>) -> Advisories {
    let prefix = name.map(|n| format!("Name = {n} ")).unwrap_or_default();
    let mut advisories = Advisories::default();

    for (key, warn_text) in keys::LEGACY_PROPERTY_WARNINGS.iter() {
        if let Some(value) = properties.get(*key) {
            advisories.warnings.push(format!(
                "{prefix}{warn_text} You have set value of \"{value}\" for \"{key}\" \
                 property, which is being ignored."
            ));
        }
    }

    for (key, value) in properties {
        let known = keys::KNOWN_PROPERTY_NAMES.contains(key.as_str());
        let legacy = keys::LEGACY_PROPERTY_WARNINGS
            .iter()
            .any(|(legacy_key, _)| *legacy_key == key.as_str());
        let silent = keys::SILENT_PROPERTIES.contains(&key.as_str());
        if !(known || legacy || silent) {
            advisories.notices.push(format!(
                "{prefix}Ignoring unknown property: value of \"{value}\" for \"{key}\" property"
            ));
        }
    }

    advisories
}
