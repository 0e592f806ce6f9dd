//! Configuration types for the membership store
//!
//! A [`StoreConfig`] selects a backend by name and carries arbitrary
//! backend-specific fields. The core only reads the name; the whole
//! structure is handed to the chosen factory opaquely.

use serde::{Deserialize, Serialize};

/// Backend selection plus opaque backend parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Name of the backend to open (e.g. "memory")
    pub name: String,

    /// Backend-specific parameters, passed to the factory unchanged
    #[serde(default)]
    pub params: serde_json::Value,
}

impl StoreConfig {
    /// Create a configuration selecting the given backend with no params
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: serde_json::Value::Null,
        }
    }

    /// Attach backend-specific parameters
    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_default_to_null() {
        let config: StoreConfig = serde_json::from_str(r#"{"name": "memory"}"#).unwrap();
        assert_eq!(config.name, "memory");
        assert!(config.params.is_null());
    }

    #[test]
    fn test_params_round_trip() {
        let config = StoreConfig::new("memory")
            .with_params(serde_json::json!({"rules": ["10.0.0.0/8"]}));
        let text = serde_json::to_string(&config).unwrap();
        let back: StoreConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
