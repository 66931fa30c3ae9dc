use std::sync::Arc;

use axum::middleware::from_fn_with_state;
use axum::Router;
use dog_core::HookRegistry;
use tokio::net::{TcpListener, ToSocketAddrs};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::intercept::intercept;
use crate::InterceptState;

/// Builds the application router: native routes behind the `LoadHandler`
/// interception, plus an external router for claimed requests.
pub struct AxumApp {
    pub hooks: Arc<HookRegistry>,
    native: Router<()>,
    external: Router<()>,
}

impl Clone for AxumApp {
    fn clone(&self) -> Self {
        Self {
            hooks: Arc::clone(&self.hooks),
            native: self.native.clone(),
            external: self.external.clone(),
        }
    }
}

impl AxumApp {
    pub fn new(hooks: Arc<HookRegistry>) -> Self {
        Self {
            hooks,
            native: Router::new(),
            external: Router::new(),
        }
    }

    /// Merge routes served by the application itself.
    pub fn native(mut self, router: Router<()>) -> Self {
        self.native = self.native.merge(router);
        self
    }

    /// Merge routes that serve requests claimed by a `LoadHandler` hook.
    pub fn external(mut self, router: Router<()>) -> Self {
        self.external = self.external.merge(router);
        self
    }

    #[cfg(feature = "shibboleth")]
    pub fn use_plugin_management(self, plugin: Arc<dog_auth_shibboleth::ShibbolethAuthPlugin>) -> Self {
        self.native(crate::manage::management_router(plugin))
    }

    pub fn router(self) -> Router<()> {
        let state = InterceptState::new(Arc::clone(&self.hooks), self.external);
        self.native
            .layer(from_fn_with_state(state, intercept))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!(addr = ?listener.local_addr()?, "listening");
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

pub fn axum(hooks: Arc<HookRegistry>) -> AxumApp {
    AxumApp::new(hooks)
}
