//! Tenant and admin scope extraction from requests.
//!
//! The reverse proxy (or an earlier middleware) resolves the tenant and
//! passes its numeric id in `x-tenant-id`. A missing or malformed header
//! means no tenant is selected.

use axum::http::{Extensions, HeaderMap};
use dog_core::{AdminScope, TenantContext, TenantId};

pub const TENANT_HEADER: &str = "x-tenant-id";

/// Marks a request as coming from a site administrator.
///
/// Inserted as a request extension by the application's authentication
/// layer. Nothing a client sends can produce it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SiteAdmin;

pub fn tenant_from_headers(headers: &HeaderMap) -> TenantContext {
    headers
        .get(TENANT_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<TenantId>().ok())
        .map(TenantContext::new)
        .unwrap_or_else(TenantContext::global)
}

/// Site administration when the request carries [`SiteAdmin`]; otherwise
/// the administrator acts in the request's tenant.
pub fn admin_scope(headers: &HeaderMap, extensions: &Extensions) -> AdminScope {
    if extensions.get::<SiteAdmin>().is_some() {
        AdminScope::Site
    } else {
        AdminScope::from(&tenant_from_headers(headers))
    }
}
