// Shibboleth plugin options.

use dog_core::DogConfig;
use serde::{Deserialize, Serialize};

/// Configuration section read from `shibboleth.*` keys. Loaded from the
/// environment with `DogConfig::load_env("DOG__")`, e.g.
/// `DOG__SHIBBOLETH__HANDLER`. The plugin's own name is fixed
/// ([`PLUGIN_NAME`](crate::PLUGIN_NAME)).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShibbolethOptions {
    /// Handler that takes over diverted requests.
    pub handler: String,
    pub display_name: String,
    pub description: String,
}

impl Default for ShibbolethOptions {
    fn default() -> Self {
        Self {
            handler: "ShibbolethHandler".to_string(),
            display_name: "Shibboleth Authentication".to_string(),
            description: "Delegates login and registration to a Shibboleth service provider in front of the application.".to_string(),
        }
    }
}

impl ShibbolethOptions {
    pub const SECTION: &'static str = "shibboleth";

    /// Read the `shibboleth` section; unset keys keep their defaults.
    pub fn from_config(config: &DogConfig) -> anyhow::Result<Self> {
        let options: Self = config.section(Self::SECTION)?;
        options
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid shibboleth options: {e}"))?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.handler.trim().is_empty() {
            return Err("handler must not be empty".to_string());
        }
        if self.handler.chars().any(char::is_whitespace) {
            return Err(format!("handler '{}' must not contain whitespace", self.handler));
        }
        if self.display_name.trim().is_empty() {
            return Err("display_name must not be empty".to_string());
        }
        Ok(())
    }

    pub fn with_handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = handler.into();
        self
    }
}
