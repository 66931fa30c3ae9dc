//! dog-core: framework-agnostic core for DogRS plugins.
//!
//! Tenants, per-tenant settings, tenant topology, request interception
//! hooks, configuration and Feathers-style errors.

pub mod config;
pub mod errors;
pub mod hooks;
pub mod settings;
pub mod tenant;
pub mod topology;

pub use config::DogConfig;
pub use errors::{DogError, DogResult, ErrorKind};
pub use hooks::{DispatchRequest, HandlerSelection, HookRegistry, LoadHandlerHook};
pub use settings::{MemorySettingsStore, SettingsError, SettingsStore};
pub use tenant::{AdminScope, TenantContext, TenantId};
pub use topology::{StaticTopology, TenantTopology};
