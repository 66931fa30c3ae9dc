use std::sync::Arc;

use axum::Router;
use dog_core::HookRegistry;

/// State of the interception middleware.
#[derive(Clone)]
pub struct InterceptState {
    pub hooks: Arc<HookRegistry>,
    /// Serves requests claimed by a `LoadHandler` hook.
    pub external: Router<()>,
}

impl InterceptState {
    pub fn new(hooks: Arc<HookRegistry>, external: Router<()>) -> Self {
        Self { hooks, external }
    }
}
