// Enable/disable permissions for the plugin toggle.

use std::sync::Arc;

use anyhow::Result;
use dog_core::{AdminScope, SettingsStore, TenantId};
use serde_json::Value;

use crate::toggle::{DeploymentTopology, ENABLED_SETTING};

/// Whether an administrator acting in `scope` may enable the plugin.
///
/// Never allowed from the no-tenant context (`Tenant(GLOBAL)`). Elsewhere it
/// is allowed unless the plugin is already enabled globally, except at site
/// scope or in a single-tenant deployment.
pub fn can_enable(topology: &DeploymentTopology, scope: AdminScope) -> bool {
    if scope == AdminScope::Tenant(TenantId::GLOBAL) {
        return false;
    }
    can_disable(topology, scope)
}

/// Whether an administrator acting in `scope` may disable the plugin.
///
/// Same rule as [`can_enable`] without the no-tenant exclusion.
pub fn can_disable(topology: &DeploymentTopology, scope: AdminScope) -> bool {
    !topology.globally_enabled || scope == AdminScope::Site || topology.single_context
}

/// Tenant the `enabled` flag is written to.
///
/// A single-tenant deployment keeps one flag at the global scope.
pub fn write_scope(topology: &DeploymentTopology, tenant: TenantId) -> TenantId {
    if topology.single_context {
        TenantId::GLOBAL
    } else {
        tenant
    }
}

pub struct EnablementAuthorizer {
    settings: Arc<dyn SettingsStore>,
    topology: DeploymentTopology,
    scope: AdminScope,
}

impl EnablementAuthorizer {
    pub fn new(settings: Arc<dyn SettingsStore>, topology: DeploymentTopology, scope: AdminScope) -> Self {
        Self {
            settings,
            topology,
            scope,
        }
    }

    pub fn scope(&self) -> AdminScope {
        self.scope
    }

    pub fn can_enable(&self) -> bool {
        can_enable(&self.topology, self.scope)
    }

    pub fn can_disable(&self) -> bool {
        can_disable(&self.topology, self.scope)
    }

    pub fn write_scope(&self, tenant: TenantId) -> TenantId {
        write_scope(&self.topology, tenant)
    }

    /// Persist the flag for `tenant` and return the scope written.
    ///
    /// The write is not redirected by the global flag: with the plugin
    /// enabled globally a tenant's own value is stored but not read back.
    pub fn set_enabled(&self, enabled: bool, tenant: TenantId) -> Result<TenantId> {
        let scope = self.write_scope(tenant);
        self.settings.set(scope, ENABLED_SETTING, Value::Bool(enabled))?;
        tracing::info!(enabled, tenant = %tenant, scope = %scope, "shibboleth toggle written");
        Ok(scope)
    }
}
