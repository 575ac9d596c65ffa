//! Mapping configuration.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Settings applied to every entity built by a `MappingContext`.
///
/// ```rust
/// use neo4j_ogm::MappingConfig;
///
/// let config = MappingConfig::from_json(r#"{ "use_short_property_names": false }"#).unwrap();
/// assert!(!config.use_short_property_names);
/// assert_eq!(config.synthetic_marker, '$');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Store properties under the bare field name unless a type overrides it.
    pub use_short_property_names: bool,
    /// Character that marks compiler-generated field names.
    pub synthetic_marker: char,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            use_short_property_names: true,
            synthetic_marker: '$',
        }
    }
}

impl MappingConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_short_property_names(mut self, short: bool) -> Self {
        self.use_short_property_names = short;
        self
    }
}
