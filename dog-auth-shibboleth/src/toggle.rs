// Feature toggle resolution.

use std::sync::Arc;

use anyhow::Result;
use dog_core::{SettingsStore, TenantContext, TenantId, TenantTopology};
use serde_json::Value;

/// Name of the boolean setting that switches the plugin on.
pub const ENABLED_SETTING: &str = "enabled";

/// Deployment facts that decide how the toggle is scoped.
///
/// Computed once when the plugin is constructed and never refreshed; build
/// a new value to observe changes. `single_context` comes from the tenant
/// topology alone and says nothing about `globally_enabled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeploymentTopology {
    /// The `enabled` setting at the global scope.
    pub globally_enabled: bool,
    /// At most one tenant is configured.
    pub single_context: bool,
}

impl DeploymentTopology {
    pub fn new(globally_enabled: bool, single_context: bool) -> Self {
        Self {
            globally_enabled,
            single_context,
        }
    }

    pub fn detect(settings: &dyn SettingsStore, tenants: &dyn TenantTopology) -> Result<Self> {
        let globally_enabled = settings.get_bool(TenantId::GLOBAL, ENABLED_SETTING)?;
        let single_context = tenants.is_single_tenant()?;
        Ok(Self::new(globally_enabled, single_context))
    }

    /// Scope any setting is read from.
    ///
    /// While the plugin is enabled globally every read goes to the global
    /// scope, whatever tenant asked.
    pub fn setting_scope(&self, tenant: TenantId) -> TenantId {
        if self.globally_enabled {
            TenantId::GLOBAL
        } else {
            tenant
        }
    }

    /// Scope the `enabled` flag is looked up in.
    pub fn enabled_scope(&self, tenant: TenantId) -> TenantId {
        if self.globally_enabled || self.single_context {
            TenantId::GLOBAL
        } else {
            tenant
        }
    }
}

/// Reads plugin settings with the global-override rules applied.
#[derive(Clone)]
pub struct FeatureToggle {
    settings: Arc<dyn SettingsStore>,
    topology: DeploymentTopology,
}

impl FeatureToggle {
    pub fn new(settings: Arc<dyn SettingsStore>, topology: DeploymentTopology) -> Self {
        Self { settings, topology }
    }

    pub fn topology(&self) -> DeploymentTopology {
        self.topology
    }

    pub fn get_setting(&self, tenant: TenantId, name: &str) -> Result<Option<Value>> {
        let scope = self.topology.setting_scope(tenant);
        Ok(self.settings.get(scope, name)?)
    }

    /// Effective enabled state.
    ///
    /// `tenant` defaults to the caller's current tenant. In a single-tenant
    /// deployment, or while enabled globally, the lookup always uses the
    /// global scope, including for an explicit `Some(tenant)`: a value
    /// stored under that tenant is never read there, matching where
    /// `EnablementAuthorizer::set_enabled` writes.
    pub fn get_enabled(&self, ctx: &TenantContext, tenant: Option<TenantId>) -> Result<bool> {
        let tenant = tenant.unwrap_or(ctx.tenant_id);
        let scope = self.topology.enabled_scope(tenant);
        Ok(self
            .get_setting(scope, ENABLED_SETTING)?
            .and_then(|v| v.as_bool())
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dog_core::{MemorySettingsStore, StaticTopology};
    use serde_json::json;

    fn store() -> Arc<MemorySettingsStore> {
        Arc::new(
            MemorySettingsStore::new()
                .with(TenantId::GLOBAL, ENABLED_SETTING, json!(true))
                .with(TenantId::GLOBAL, "attribute", json!("global"))
                .with(TenantId(5), ENABLED_SETTING, json!(false))
                .with(TenantId(5), "attribute", json!("tenant-5")),
        )
    }

    #[test]
    fn detect_reads_global_flag_and_tenant_count() {
        let settings = store();
        let multi = StaticTopology::new([TenantId(5), TenantId(6)]);
        let topology = DeploymentTopology::detect(&*settings, &multi).unwrap();
        assert_eq!(topology, DeploymentTopology::new(true, false));

        let empty = MemorySettingsStore::new();
        let single = StaticTopology::single(TenantId(5));
        let topology = DeploymentTopology::detect(&empty, &single).unwrap();
        assert_eq!(topology, DeploymentTopology::new(false, true));
    }

    #[test]
    fn globally_enabled_redirects_every_setting() {
        let toggle = FeatureToggle::new(store(), DeploymentTopology::new(true, false));
        for tenant in [TenantId::GLOBAL, TenantId(5), TenantId(99)] {
            for name in [ENABLED_SETTING, "attribute", "missing"] {
                assert_eq!(
                    toggle.get_setting(tenant, name).unwrap(),
                    toggle.get_setting(TenantId::GLOBAL, name).unwrap()
                );
            }
        }
    }

    #[test]
    fn per_tenant_reads_without_global_flag() {
        let toggle = FeatureToggle::new(store(), DeploymentTopology::new(false, false));
        assert_eq!(
            toggle.get_setting(TenantId(5), "attribute").unwrap(),
            Some(json!("tenant-5"))
        );
        assert!(!toggle.get_enabled(&TenantContext::new(TenantId(5)), None).unwrap());
        assert!(toggle.get_enabled(&TenantContext::new(TenantId(5)), Some(TenantId::GLOBAL)).unwrap());
        assert!(!toggle.get_enabled(&TenantContext::new(TenantId(7)), None).unwrap());
    }

    #[test]
    fn single_context_collapses_to_global() {
        let settings = Arc::new(
            MemorySettingsStore::new()
                .with(TenantId::GLOBAL, ENABLED_SETTING, json!(false))
                .with(TenantId(1), ENABLED_SETTING, json!(true)),
        );
        let toggle = FeatureToggle::new(settings, DeploymentTopology::new(false, true));
        assert!(!toggle.get_enabled(&TenantContext::new(TenantId(1)), None).unwrap());
        assert!(!toggle.get_enabled(&TenantContext::global(), Some(TenantId(1))).unwrap());
    }

    #[test]
    fn missing_or_malformed_flag_is_disabled() {
        let settings = Arc::new(MemorySettingsStore::new().with(TenantId(3), ENABLED_SETTING, json!(1)));
        let toggle = FeatureToggle::new(settings, DeploymentTopology::default());
        assert!(!toggle.get_enabled(&TenantContext::new(TenantId(3)), None).unwrap());
        assert!(!toggle.get_enabled(&TenantContext::new(TenantId(4)), None).unwrap());
    }
}
