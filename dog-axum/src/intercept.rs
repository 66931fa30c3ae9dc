//! `LoadHandler` interception for axum.
//!
//! Every request is mapped to a `(page, op)` pair from its path
//! (`/{context}/{page}/{op}/...`) and run through the `LoadHandler` hooks.
//! A claimed request is served by the external router; anything else
//! continues to the native routes. Both see the tenant context, the
//! dispatch request and the [`HandlerSelection`] as request extensions.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dog_core::{DispatchRequest, HandlerSelection};
use tower::ServiceExt;

use crate::state::InterceptState;
use crate::tenant::tenant_from_headers;

/// Dispatch target of a request path. The first segment is the tenant's
/// path and is skipped.
pub fn dispatch_request_from_path(path: &str) -> DispatchRequest {
    DispatchRequest::from_segments(path.split('/').filter(|s| !s.is_empty()).skip(1))
}

pub async fn intercept(State(state): State<InterceptState>, mut req: Request, next: Next) -> Response {
    let tenant = tenant_from_headers(req.headers());
    let dispatch = dispatch_request_from_path(req.uri().path());
    let selection = state.hooks.load_handler(&tenant, &dispatch);

    req.extensions_mut().insert(tenant);
    req.extensions_mut().insert(dispatch);
    req.extensions_mut().insert(selection.clone());

    match selection {
        HandlerSelection::Native => next.run(req).await,
        HandlerSelection::External { .. } => match state.external.oneshot(req).await {
            Ok(res) => res.into_response(),
            Err(never) => match never {},
        },
    }
}
