// Request dispatch to the Shibboleth handler.

use dog_core::{DispatchRequest, HandlerSelection, LoadHandlerHook, TenantContext};

use crate::toggle::FeatureToggle;

/// Page owned by the Shibboleth handler; every op on it is diverted.
pub const SHIBBOLETH_PAGE: &str = "shibboleth";

/// `login` ops taken over while the plugin is enabled.
pub const LOGIN_OPS: &[&str] = &[
    "changePassword",
    "index",
    "lostPassword",
    "requestResetPassword",
    "savePassword",
    "signIn",
    "signOut",
];

/// `user` ops taken over while the plugin is enabled.
pub const USER_OPS: &[&str] = &["activateUser", "register", "registerUser", "validate"];

/// True when `(page, op)` belongs to the login/registration flow the
/// external handler replaces. Ignores whether the plugin is enabled.
pub fn is_delegated(request: &DispatchRequest) -> bool {
    match request.page.as_str() {
        SHIBBOLETH_PAGE => true,
        "login" => LOGIN_OPS.contains(&request.op.as_str()),
        "user" => USER_OPS.contains(&request.op.as_str()),
        _ => false,
    }
}

/// `LoadHandler` hook that diverts login traffic to the external handler.
#[derive(Clone)]
pub struct DispatchPredicate {
    toggle: FeatureToggle,
    handler: String,
    plugin: String,
}

impl DispatchPredicate {
    pub fn new(toggle: FeatureToggle, handler: impl Into<String>, plugin: impl Into<String>) -> Self {
        Self {
            toggle,
            handler: handler.into(),
            plugin: plugin.into(),
        }
    }

    pub fn evaluate(&self, ctx: &TenantContext, request: &DispatchRequest) -> HandlerSelection {
        let enabled = match self.toggle.get_enabled(ctx, None) {
            Ok(enabled) => enabled,
            Err(e) => {
                tracing::warn!(tenant = %ctx.tenant_id, error = %e, "could not read shibboleth toggle; using native handlers");
                false
            }
        };

        if !enabled {
            return HandlerSelection::Native;
        }

        if is_delegated(request) {
            tracing::debug!(page = %request.page, op = %request.op, handler = %self.handler, "diverting to shibboleth handler");
            HandlerSelection::external(self.handler.as_str(), self.plugin.as_str())
        } else {
            HandlerSelection::Native
        }
    }
}

impl LoadHandlerHook for DispatchPredicate {
    fn name(&self) -> &str {
        &self.plugin
    }

    fn load_handler(&self, ctx: &TenantContext, request: &DispatchRequest) -> HandlerSelection {
        self.evaluate(ctx, request)
    }
}
