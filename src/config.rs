//! Engine configuration.
//!
//! Everything here is optional: a default config searches no properties and
//! stringifies values with [`ValueFormat::Plain`].
//!
//! ```
//! use spark_derived_list::{EngineConfig, ValueFormat};
//!
//! let config = EngineConfig::from_json(r#"{ "search_properties": ["name"], "value_format": "title_bool" }"#).unwrap();
//! assert_eq!(config.search_properties, vec!["name".to_string()]);
//! assert_eq!(config.value_format, ValueFormat::TitleBool);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::ValueFormat;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Properties the search stage inspects, in order. Empty disables search.
    pub search_properties: Vec<String>,
    /// Stringifier shared by the filter stage and condition producers.
    pub value_format: ValueFormat,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the searchable properties.
    pub fn with_search_properties<I, P>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.search_properties = properties.into_iter().map(Into::into).collect();
        self
    }

    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert!(config.search_properties.is_empty());
        assert_eq!(config.value_format, ValueFormat::Plain);
    }

    #[test]
    fn test_from_json_partial() {
        let config = EngineConfig::from_json(r#"{ "search_properties": ["extra", "name"] }"#).unwrap();
        assert_eq!(config.search_properties, vec!["extra", "name"]);
        assert_eq!(config.value_format, ValueFormat::Plain);

        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_from_json_rejects_unknown_format() {
        let err = EngineConfig::from_json(r#"{ "value_format": "shouty" }"#).unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_serialize_round_trip() {
        let config = EngineConfig {
            value_format: ValueFormat::TitleBool,
            ..EngineConfig::new().with_search_properties(["extra"])
        };

        assert_eq!(config.search_properties, vec!["extra"]);
        assert_eq!(config.value_format, ValueFormat::TitleBool);

        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }
}
