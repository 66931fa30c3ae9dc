//! dog-axum: Axum adapter for DogRS.
//!
//! Runs the `LoadHandler` hooks for every request, routes claimed
//! requests to an external handler router, mounts plugin management
//! routes and renders `DogError`s as Feathers-style JSON.

pub mod app;
pub mod intercept;
#[cfg(feature = "shibboleth")]
pub mod manage;
pub mod state;
pub mod tenant;
mod error;
pub use error::DogAxumError;
pub use state::InterceptState;

pub use app::{axum, AxumApp};
pub use intercept::dispatch_request_from_path;
pub use tenant::{admin_scope, tenant_from_headers, SiteAdmin};
