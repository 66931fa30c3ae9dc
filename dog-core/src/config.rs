//! # DogRS Configuration
//!
//! A minimal string key/value store, mirroring Feathers' `app.set()` /
//! `app.get()`. Keys are dotted (`shibboleth.handler`). Values can be
//! layered from the environment with [`DogConfig::load_env`]:
//!
//! ```rust
//! use dog_core::DogConfig;
//!
//! let mut config = DogConfig::new();
//! config.set("shibboleth.handler", "ShibbolethHandler");
//! config.load_vars("DOG__", [("DOG__SHIBBOLETH__HANDLER", "SamlHandler")]);
//!
//! assert_eq!(config.get("shibboleth.handler"), Some("SamlHandler"));
//! ```
//!
//! `DOG__SHIBBOLETH__HANDLER` maps to `shibboleth.handler`: the prefix is
//! stripped, the rest lowercased, and `__` becomes `.`.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default)]
pub struct DogConfig {
    values: HashMap<String, String>,
}

impl DogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.trim().parse::<bool>().ok())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    /// Overlay process environment variables that start with `prefix`.
    pub fn load_env(&mut self, prefix: &str) {
        self.load_vars(prefix, std::env::vars());
    }

    pub fn load_vars<I, K, V>(&mut self, prefix: &str, vars: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (key, value) in vars {
            if let Some(stripped) = key.as_ref().strip_prefix(prefix) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                if !normalized.is_empty() {
                    self.set(normalized, value);
                }
            }
        }
    }

    /// Deserialize every `section.*` key into `T`.
    ///
    /// Keys below the section become fields (`shibboleth.display_name` →
    /// `display_name`). Values stay strings, so `T` should use string fields
    /// or `serde(default)` for anything it parses itself.
    pub fn section<T>(&self, section: &str) -> anyhow::Result<T>
    where
        T: DeserializeOwned,
    {
        let prefix = format!("{section}.");
        let map: Map<String, Value> = self
            .values
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(&prefix)
                    .map(|field| (field.to_string(), Value::String(v.clone())))
            })
            .collect();

        serde_json::from_value(Value::Object(map))
            .map_err(|e| anyhow::anyhow!("invalid `{section}` configuration: {e}"))
    }
}
