// Settings form for the management "settings" verb.

use anyhow::Result;
use dog_core::{TenantContext, TenantId};
use serde::Serialize;
use serde_json::{json, Value};

use crate::authorizer::EnablementAuthorizer;
use crate::toggle::FeatureToggle;

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub struct ShibbolethSettingsForm {
    toggle: FeatureToggle,
    authorizer: EnablementAuthorizer,
    enabled: Option<Value>,
}

impl ShibbolethSettingsForm {
    pub fn new(toggle: FeatureToggle, authorizer: EnablementAuthorizer) -> Self {
        Self {
            toggle,
            authorizer,
            enabled: None,
        }
    }

    fn tenant(&self) -> TenantId {
        self.authorizer.scope().storage_tenant()
    }

    /// Current values and what this administrator may change.
    pub fn init_data(&self) -> Result<Value> {
        let ctx = TenantContext::new(self.tenant());
        let enabled = self.toggle.get_enabled(&ctx, None)?;
        Ok(json!({
            "enabled": enabled,
            "canEnable": self.authorizer.can_enable(),
            "canDisable": self.authorizer.can_disable(),
        }))
    }

    pub fn read_input(&mut self, input: &Value) {
        self.enabled = input.get("enabled").cloned();
    }

    pub fn validate(&self) -> Result<bool, Vec<FieldError>> {
        let enabled = match &self.enabled {
            None => return Err(vec![FieldError::new("enabled", "is required")]),
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) if s == "true" || s == "1" || s == "on" => true,
            Some(Value::String(s)) if s == "false" || s == "0" || s == "off" => false,
            Some(_) => return Err(vec![FieldError::new("enabled", "must be a boolean")]),
        };

        if enabled && !self.authorizer.can_enable() {
            return Err(vec![FieldError::new("enabled", "enabling is not permitted in this context")]);
        }
        if !enabled && !self.authorizer.can_disable() {
            return Err(vec![FieldError::new("enabled", "disabling is not permitted in this context")]);
        }

        Ok(enabled)
    }

    /// Validate and persist. Returns the field errors if validation failed.
    pub fn execute(&self) -> Result<Result<TenantId, Vec<FieldError>>> {
        let enabled = match self.validate() {
            Ok(enabled) => enabled,
            Err(errors) => return Ok(Err(errors)),
        };
        let scope = self.authorizer.set_enabled(enabled, self.tenant())?;
        Ok(Ok(scope))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::toggle::{DeploymentTopology, ENABLED_SETTING};
    use dog_core::{AdminScope, MemorySettingsStore, SettingsStore};

    fn form(settings: Arc<MemorySettingsStore>, topology: DeploymentTopology, scope: AdminScope) -> ShibbolethSettingsForm {
        let toggle = FeatureToggle::new(settings.clone(), topology);
        let authorizer = EnablementAuthorizer::new(settings, topology, scope);
        ShibbolethSettingsForm::new(toggle, authorizer)
    }

    #[test]
    fn init_data_reports_permissions() {
        let settings = Arc::new(MemorySettingsStore::new().with(TenantId(2), ENABLED_SETTING, json!(true)));
        let f = form(settings, DeploymentTopology::new(false, false), AdminScope::Tenant(TenantId(2)));
        assert_eq!(
            f.init_data().unwrap(),
            json!({"enabled": true, "canEnable": true, "canDisable": true})
        );
    }

    #[test]
    fn validates_enabled_field() {
        let settings = Arc::new(MemorySettingsStore::new());
        let mut f = form(settings, DeploymentTopology::new(false, false), AdminScope::Tenant(TenantId(2)));

        assert_eq!(f.validate().unwrap_err()[0].message, "is required");

        f.read_input(&json!({"enabled": 3}));
        assert_eq!(f.validate().unwrap_err()[0].message, "must be a boolean");

        f.read_input(&json!({"enabled": "on"}));
        assert_eq!(f.validate(), Ok(true));
    }

    #[test]
    fn refuses_enable_without_tenant() {
        let settings = Arc::new(MemorySettingsStore::new());
        let mut f = form(settings.clone(), DeploymentTopology::new(false, false), AdminScope::Tenant(TenantId::GLOBAL));

        f.read_input(&json!({"enabled": true}));
        let errors = f.execute().unwrap().unwrap_err();
        assert_eq!(errors[0].field, "enabled");
        assert!(!settings.contains(TenantId::GLOBAL, ENABLED_SETTING).unwrap());

        f.read_input(&json!({"enabled": false}));
        assert_eq!(f.execute().unwrap(), Ok(TenantId::GLOBAL));
        assert_eq!(settings.get(TenantId::GLOBAL, ENABLED_SETTING).unwrap(), Some(json!(false)));
    }

    #[test]
    fn execute_persists_for_tenant() {
        let settings = Arc::new(MemorySettingsStore::new());
        let mut f = form(settings.clone(), DeploymentTopology::new(false, false), AdminScope::Tenant(TenantId(8)));
        f.read_input(&json!({"enabled": true}));
        assert_eq!(f.execute().unwrap(), Ok(TenantId(8)));
        assert!(settings.get_bool(TenantId(8), ENABLED_SETTING).unwrap());
    }
}
