//! dog-auth-shibboleth: delegate login to a Shibboleth service provider.
//!
//! The web server in front of the application (e.g. Apache `mod_shib`)
//! authenticates users and injects identity headers. This crate decides,
//! per tenant and per request, whether login and registration pages are
//! served by the external Shibboleth handler instead of the native forms,
//! and who may switch that on or off.

pub mod authorizer;
pub mod dispatch;
pub mod options;
pub mod plugin;
pub mod settings_form;
pub mod toggle;

pub use authorizer::{can_disable, can_enable, EnablementAuthorizer};
pub use dispatch::{is_delegated, DispatchPredicate, LOGIN_OPS, SHIBBOLETH_PAGE, USER_OPS};
pub use options::ShibbolethOptions;
pub use plugin::{JsonMessage, LinkAction, ManageRequest, ShibbolethAuthPlugin, PLUGIN_NAME, SETTINGS_VERB};
pub use settings_form::{FieldError, ShibbolethSettingsForm};
pub use toggle::{DeploymentTopology, FeatureToggle, ENABLED_SETTING};
