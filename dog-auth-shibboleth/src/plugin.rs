// Shibboleth authentication plugin.

use std::sync::Arc;

use anyhow::Result;
use dog_core::errors::DogError;
use dog_core::{bail_dog, AdminScope, HookRegistry, SettingsError, SettingsStore, TenantContext, TenantId, TenantTopology};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::authorizer::EnablementAuthorizer;
use crate::dispatch::DispatchPredicate;
use crate::options::ShibbolethOptions;
use crate::settings_form::ShibbolethSettingsForm;
use crate::toggle::{DeploymentTopology, FeatureToggle};

/// Canonical plugin name. Diverted requests carry it so the handler can
/// find the plugin's settings.
pub const PLUGIN_NAME: &str = "ShibbolethAuthPlugin";

pub const SETTINGS_VERB: &str = "settings";

/// Input of a management call.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct ManageRequest {
    /// Submit the form instead of fetching it.
    #[serde(default)]
    pub save: bool,
    #[serde(default)]
    pub input: Value,
}

/// Reply of a management call.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct JsonMessage {
    pub status: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl JsonMessage {
    pub fn ok() -> Self {
        Self {
            status: true,
            content: None,
        }
    }

    pub fn with_content(status: bool, content: Value) -> Self {
        Self {
            status,
            content: Some(content),
        }
    }
}

/// Link shown next to the plugin in the plugin list.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct LinkAction {
    pub id: String,
    pub title: String,
    pub url: String,
}

/// Store failures reach management clients as `Unavailable`.
fn settings_unavailable(err: anyhow::Error) -> anyhow::Error {
    match err.downcast::<SettingsError>() {
        Ok(e) => DogError::from(e).into_anyhow(),
        Err(other) => other,
    }
}

pub struct ShibbolethAuthPlugin {
    settings: Arc<dyn SettingsStore>,
    options: ShibbolethOptions,
    topology: DeploymentTopology,
}

impl ShibbolethAuthPlugin {
    /// Reads the deployment topology once; later setting or tenant changes
    /// need a new plugin instance.
    pub fn new(
        settings: Arc<dyn SettingsStore>,
        tenants: &dyn TenantTopology,
        options: ShibbolethOptions,
    ) -> Result<Self> {
        options
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid shibboleth options: {e}"))?;
        let topology = DeploymentTopology::detect(settings.as_ref(), tenants)?;
        tracing::debug!(
            globally_enabled = topology.globally_enabled,
            single_context = topology.single_context,
            "shibboleth deployment topology"
        );
        Ok(Self {
            settings,
            options,
            topology,
        })
    }

    pub fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    pub fn display_name(&self) -> &str {
        &self.options.display_name
    }

    pub fn description(&self) -> &str {
        &self.options.description
    }

    /// Managed site-wide, with per-tenant enablement.
    pub fn is_site_plugin(&self) -> bool {
        true
    }

    pub fn options(&self) -> &ShibbolethOptions {
        &self.options
    }

    pub fn topology(&self) -> DeploymentTopology {
        self.topology
    }

    pub fn toggle(&self) -> FeatureToggle {
        FeatureToggle::new(Arc::clone(&self.settings), self.topology)
    }

    pub fn authorizer(&self, scope: AdminScope) -> EnablementAuthorizer {
        EnablementAuthorizer::new(Arc::clone(&self.settings), self.topology, scope)
    }

    pub fn dispatch_predicate(&self) -> DispatchPredicate {
        DispatchPredicate::new(self.toggle(), self.options.handler.as_str(), PLUGIN_NAME)
    }

    pub fn get_setting(&self, tenant: TenantId, name: &str) -> Result<Option<Value>> {
        self.toggle().get_setting(tenant, name)
    }

    pub fn get_enabled(&self, ctx: &TenantContext, tenant: Option<TenantId>) -> Result<bool> {
        self.toggle().get_enabled(ctx, tenant)
    }

    /// Install the `LoadHandler` hook if the plugin is enabled for `ctx`.
    ///
    /// Returns whether the hook was installed.
    pub fn register(&self, hooks: &HookRegistry, ctx: &TenantContext) -> Result<bool> {
        if !self.get_enabled(ctx, None)? {
            tracing::debug!(tenant = %ctx.tenant_id, "shibboleth disabled; LoadHandler hook not installed");
            return Ok(false);
        }
        hooks.register_load_handler(Arc::new(self.dispatch_predicate()));
        tracing::info!(tenant = %ctx.tenant_id, handler = %self.options.handler, "shibboleth LoadHandler hook installed");
        Ok(true)
    }

    /// Management entry point. Only the `settings` verb is handled.
    pub fn manage(&self, verb: &str, request: &ManageRequest, scope: AdminScope) -> Result<JsonMessage> {
        if verb != SETTINGS_VERB {
            bail_dog!(not_found, "Unknown management verb '{}' for {}", verb, PLUGIN_NAME);
        }

        let mut form = ShibbolethSettingsForm::new(self.toggle(), self.authorizer(scope));

        if !request.save {
            let data = form.init_data().map_err(settings_unavailable)?;
            return Ok(JsonMessage::with_content(true, data));
        }

        form.read_input(&request.input);
        match form.execute().map_err(settings_unavailable)? {
            Ok(_) => Ok(JsonMessage::ok()),
            Err(errors) => {
                tracing::debug!(?scope, ?errors, "shibboleth settings rejected");
                Ok(JsonMessage::with_content(false, json!({ "errors": errors })))
            }
        }
    }

    /// The "settings" action, pointing at the management endpoint under `base_url`.
    pub fn settings_action(&self, base_url: &str) -> LinkAction {
        LinkAction {
            id: SETTINGS_VERB.to_string(),
            title: "Settings".to_string(),
            url: format!(
                "{}/management/plugins/{PLUGIN_NAME}/manage?verb={SETTINGS_VERB}&plugin={PLUGIN_NAME}&category=generic",
                base_url.trim_end_matches('/')
            ),
        }
    }
}
