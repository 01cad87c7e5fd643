//! The resolved configuration map.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_yaml::Value;

use crate::error::BootstrapError;

use super::resolve::expand_home;

/// Fully resolved configuration: top-level string keys mapped to arbitrary
/// YAML values. Built once at startup and treated as immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigMap {
    entries: BTreeMap<String, Value>,
}

impl ConfigMap {
    /// Build a map from a parsed YAML document. The document must be a
    /// mapping with string keys.
    pub(crate) fn from_value(value: Value) -> Result<Self, BootstrapError> {
        let Value::Mapping(mapping) = value else {
            return Err(BootstrapError::Parse(
                "top-level config document must be a mapping".into(),
            ));
        };
        let mut entries = BTreeMap::new();
        for (key, val) in mapping {
            let Value::String(key) = key else {
                return Err(BootstrapError::Parse(format!(
                    "top-level config keys must be strings, got {key:?}"
                )));
            };
            entries.insert(key, val);
        }
        Ok(Self { entries })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// The folder holding the config file and other persistent data.
    /// Falls back to `~/.takhub` when the key is absent.
    pub fn data_folder(&self) -> PathBuf {
        match self.get_str("data_folder") {
            Some(path) => expand_home(path),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".takhub"),
        }
    }

    /// Extract a typed section. An absent (or explicitly null) section yields
    /// the section's defaults; a present section must deserialize cleanly.
    pub fn section<T>(&self, key: &str) -> Result<T, BootstrapError>
    where
        T: DeserializeOwned + Default,
    {
        match self.entries.get(key) {
            None | Some(Value::Null) => Ok(T::default()),
            Some(value) => serde_yaml::from_value(value.clone())
                .map_err(|e| BootstrapError::Parse(format!("invalid `{key}` section: {e}"))),
        }
    }

    /// Shallow top-level merge: every key in `overlay` replaces this map's
    /// value for that key wholesale; keys the overlay does not mention are
    /// left untouched.
    pub fn merge_overlay(&mut self, overlay: ConfigMap) {
        self.entries.extend(overlay.entries);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
