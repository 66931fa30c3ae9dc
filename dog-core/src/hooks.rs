//! # Request interception hooks
//!
//! Before a page handler is chosen for a request, DogRS runs the
//! `LoadHandler` hooks. Each hook sees the `(page, op)` pair and the
//! request's tenant context and may claim the request for another handler.
//! The first hook that claims it wins; when none does, the application's
//! native handler runs.
//!
//! The selection is returned as a value and carried along the request
//! pipeline, so handlers read it from the request instead of global state.

use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::tenant::TenantContext;

/// The routing target of one inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DispatchRequest {
    pub page: String,
    pub op: String,
}

impl DispatchRequest {
    pub fn new(page: impl Into<String>, op: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            op: op.into(),
        }
    }

    /// Parse the `page/op` part of a request path.
    ///
    /// Missing segments default to `index`, like the page router does.
    pub fn from_segments<'a, I>(segments: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut it = segments.into_iter().filter(|s| !s.is_empty());
        let page = it.next().unwrap_or("index");
        let op = it.next().unwrap_or("index");
        Self::new(page, op)
    }
}

/// Which handler serves a request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HandlerSelection {
    #[default]
    Native,
    External {
        /// Identifier of the handler that takes over the request.
        handler: String,
        /// Canonical name of the plugin that claimed the request, so the
        /// handler can read that plugin's settings.
        plugin: String,
    },
}

impl HandlerSelection {
    pub fn external(handler: impl Into<String>, plugin: impl Into<String>) -> Self {
        HandlerSelection::External {
            handler: handler.into(),
            plugin: plugin.into(),
        }
    }

    pub fn is_intercepted(&self) -> bool {
        matches!(self, HandlerSelection::External { .. })
    }

    pub fn handler_id(&self) -> Option<&str> {
        match self {
            HandlerSelection::Native => None,
            HandlerSelection::External { handler, .. } => Some(handler),
        }
    }

    pub fn plugin_name(&self) -> Option<&str> {
        match self {
            HandlerSelection::Native => None,
            HandlerSelection::External { plugin, .. } => Some(plugin),
        }
    }
}

/// A `LoadHandler` hook.
///
/// Hooks must not fail: a hook that cannot decide returns
/// [`HandlerSelection::Native`].
pub trait LoadHandlerHook: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    fn load_handler(&self, ctx: &TenantContext, request: &DispatchRequest) -> HandlerSelection;
}

#[derive(Default)]
pub struct HookRegistry {
    load_handler: RwLock<Vec<Arc<dyn LoadHandlerHook>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_load_handler(&self, hook: Arc<dyn LoadHandlerHook>) {
        tracing::debug!(hook = hook.name(), "registering LoadHandler hook");
        match self.load_handler.write() {
            Ok(mut hooks) => hooks.push(hook),
            Err(poisoned) => poisoned.into_inner().push(hook),
        }
    }

    pub fn load_handler_count(&self) -> usize {
        match self.load_handler.read() {
            Ok(hooks) => hooks.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Run the `LoadHandler` hooks in registration order.
    pub fn load_handler(&self, ctx: &TenantContext, request: &DispatchRequest) -> HandlerSelection {
        let hooks: Vec<Arc<dyn LoadHandlerHook>> = match self.load_handler.read() {
            Ok(hooks) => hooks.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };

        for hook in hooks {
            let selection = hook.load_handler(ctx, request);
            if selection.is_intercepted() {
                tracing::debug!(
                    hook = hook.name(),
                    page = %request.page,
                    op = %request.op,
                    tenant = %ctx.tenant_id,
                    "request claimed by LoadHandler hook"
                );
                return selection;
            }
        }

        HandlerSelection::Native
    }
}
