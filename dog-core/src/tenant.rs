//! Core multi-tenant types for DogRS.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Numeric tenant ("context") identifier.
///
/// `TenantId::GLOBAL` (0) is the site-wide storage scope. A request that
/// has no tenant selected also carries `GLOBAL`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(pub u64);

impl TenantId {
    pub const GLOBAL: TenantId = TenantId(0);

    pub fn is_global(&self) -> bool {
        *self == Self::GLOBAL
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TenantId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(TenantId)
    }
}

impl From<u64> for TenantId {
    fn from(v: u64) -> Self {
        TenantId(v)
    }
}

/// Context carried with every request.
///
/// Hooks and plugins read the caller's current tenant from here instead
/// of looking it up from ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TenantContext {
    pub tenant_id: TenantId,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId) -> Self {
        Self { tenant_id }
    }

    /// The "no tenant selected" context.
    pub fn global() -> Self {
        Self::new(TenantId::GLOBAL)
    }
}

/// The scope an administrator is acting in.
///
/// `Site` is explicit site administration. `Tenant(TenantId::GLOBAL)` is the
/// ambiguous context where no tenant is selected; the two are kept apart
/// because permission checks treat them differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdminScope {
    Site,
    Tenant(TenantId),
}

impl AdminScope {
    /// Tenant id used for storage when acting in this scope.
    pub fn storage_tenant(&self) -> TenantId {
        match self {
            AdminScope::Site => TenantId::GLOBAL,
            AdminScope::Tenant(id) => *id,
        }
    }
}

impl From<&TenantContext> for AdminScope {
    fn from(ctx: &TenantContext) -> Self {
        AdminScope::Tenant(ctx.tenant_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_numeric_tenant_ids() {
        assert_eq!(" 42 ".parse::<TenantId>().unwrap(), TenantId(42));
        assert!("acme".parse::<TenantId>().is_err());
    }

    #[test]
    fn site_scope_stores_globally() {
        assert_eq!(AdminScope::Site.storage_tenant(), TenantId::GLOBAL);
        assert_eq!(AdminScope::Tenant(TenantId(7)).storage_tenant(), TenantId(7));
        assert_ne!(AdminScope::Site, AdminScope::Tenant(TenantId::GLOBAL));
    }
}
