//! # Plugin settings
//!
//! Plugins persist their configuration through a [`SettingsStore`],
//! keyed by `(TenantId, name)`. `TenantId::GLOBAL` holds the site-wide
//! values. How values are stored is up to the implementation; DogRS
//! ships an in-memory store for tests and single-process deployments.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde_json::Value;

use crate::tenant::TenantId;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings store lock poisoned")]
    Poisoned,

    #[error("setting '{name}' for tenant {tenant} has an invalid value: {message}")]
    InvalidValue {
        tenant: TenantId,
        name: String,
        message: String,
    },

    #[error("settings backend error: {0}")]
    Backend(String),
}

/// Key/value settings scoped by tenant.
pub trait SettingsStore: Send + Sync {
    fn get(&self, tenant: TenantId, name: &str) -> Result<Option<Value>, SettingsError>;

    fn set(&self, tenant: TenantId, name: &str, value: Value) -> Result<(), SettingsError>;

    /// Read a boolean setting. Missing values read as `false`.
    fn get_bool(&self, tenant: TenantId, name: &str) -> Result<bool, SettingsError> {
        Ok(self
            .get(tenant, name)?
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }
}

#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    values: RwLock<HashMap<(TenantId, String), Value>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seeding, mostly for tests and fixtures.
    pub fn with(mut self, tenant: TenantId, name: &str, value: Value) -> Self {
        self.values
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((tenant, name.to_string()), value);
        self
    }

    pub fn contains(&self, tenant: TenantId, name: &str) -> Result<bool, SettingsError> {
        let values = self.values.read().map_err(|_| SettingsError::Poisoned)?;
        Ok(values.contains_key(&(tenant, name.to_string())))
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, tenant: TenantId, name: &str) -> Result<Option<Value>, SettingsError> {
        let values = self.values.read().map_err(|_| SettingsError::Poisoned)?;
        Ok(values.get(&(tenant, name.to_string())).cloned())
    }

    fn set(&self, tenant: TenantId, name: &str, value: Value) -> Result<(), SettingsError> {
        let mut values = self.values.write().map_err(|_| SettingsError::Poisoned)?;
        values.insert((tenant, name.to_string()), value);
        Ok(())
    }
}
