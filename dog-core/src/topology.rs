//! Tenant enumeration.
//!
//! Plugins that behave differently in single-tenant and multi-tenant
//! deployments ask a [`TenantTopology`] which tenants are configured.

use std::sync::RwLock;

use anyhow::Result;

use crate::tenant::TenantId;

pub trait TenantTopology: Send + Sync {
    /// All tenants currently available (enabled) in this deployment.
    fn available_tenants(&self) -> Result<Vec<TenantId>>;

    fn tenant_count(&self) -> Result<usize> {
        Ok(self.available_tenants()?.len())
    }

    /// True when at most one tenant is configured.
    fn is_single_tenant(&self) -> Result<bool> {
        Ok(self.tenant_count()? <= 1)
    }
}

/// Fixed tenant list, for tests and statically configured deployments.
#[derive(Debug, Default)]
pub struct StaticTopology {
    tenants: RwLock<Vec<TenantId>>,
}

impl StaticTopology {
    pub fn new<I>(tenants: I) -> Self
    where
        I: IntoIterator<Item = TenantId>,
    {
        Self {
            tenants: RwLock::new(tenants.into_iter().collect()),
        }
    }

    pub fn single(tenant: TenantId) -> Self {
        Self::new([tenant])
    }

    pub fn add(&self, tenant: TenantId) -> Result<()> {
        let mut tenants = self
            .tenants
            .write()
            .map_err(|_| anyhow::anyhow!("tenant topology lock poisoned"))?;
        if !tenants.contains(&tenant) {
            tenants.push(tenant);
        }
        Ok(())
    }
}

impl TenantTopology for StaticTopology {
    fn available_tenants(&self) -> Result<Vec<TenantId>> {
        let tenants = self
            .tenants
            .read()
            .map_err(|_| anyhow::anyhow!("tenant topology lock poisoned"))?;
        Ok(tenants.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_single_deployments_are_single_tenant() {
        assert!(StaticTopology::new([]).is_single_tenant().unwrap());
        assert!(StaticTopology::single(TenantId(1)).is_single_tenant().unwrap());
    }

    #[test]
    fn adding_a_second_tenant_makes_it_multi_tenant() {
        let topology = StaticTopology::single(TenantId(1));
        topology.add(TenantId(1)).unwrap();
        assert_eq!(topology.tenant_count().unwrap(), 1);

        topology.add(TenantId(2)).unwrap();
        assert!(!topology.is_single_tenant().unwrap());
    }
}
