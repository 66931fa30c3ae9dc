//! Plugin management routes.
//!
//! `GET  /{context}/management/plugins/{plugin}/manage?verb=settings` fetches the form data.
//! `POST /{context}/management/plugins/{plugin}/manage?verb=settings` saves it (JSON body).
//!
//! The site scope requires a [`SiteAdmin`](crate::tenant::SiteAdmin)
//! extension from the application's authentication layer.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::{Extensions, HeaderMap};
use axum::routing::get;
use axum::{Json, Router};
use dog_auth_shibboleth::{JsonMessage, ManageRequest, ShibbolethAuthPlugin};
use dog_core::errors::DogError;
use serde::Deserialize;
use serde_json::json;

use crate::tenant::admin_scope;
use crate::DogAxumError;

pub const MANAGE_PATH: &str = "/{context}/management/plugins/{plugin}/manage";

#[derive(Debug, Deserialize)]
struct ManageQuery {
    verb: Option<String>,
}

fn map_json_rejection(rejection: JsonRejection) -> DogAxumError {
    DogError::bad_request("Failed to parse the request body as JSON")
        .with_errors(json!({"_schema": [rejection.to_string()]}))
        .into()
}

fn check_plugin(plugin: &ShibbolethAuthPlugin, requested: &str) -> Result<(), DogAxumError> {
    if requested != plugin.name() {
        return Err(DogError::not_found(format!("Plugin not found: {requested}")).into());
    }
    Ok(())
}

fn verb(query: &ManageQuery) -> Result<&str, DogAxumError> {
    query
        .verb
        .as_deref()
        .ok_or_else(|| DogError::bad_request("Missing `verb` query parameter").into())
}

pub fn management_router(plugin: Arc<ShibbolethAuthPlugin>) -> Router<()> {
    Router::new()
        .route(
            MANAGE_PATH,
            get(
                |State(plugin): State<Arc<ShibbolethAuthPlugin>>,
                 headers: HeaderMap,
                 extensions: Extensions,
                 Path((_context, name)): Path<(String, String)>,
                 Query(query): Query<ManageQuery>| async move {
                    check_plugin(&plugin, &name)?;
                    let scope = admin_scope(&headers, &extensions);
                    let reply = plugin.manage(verb(&query)?, &ManageRequest::default(), scope)?;
                    Ok::<Json<JsonMessage>, DogAxumError>(Json(reply))
                },
            )
            .post(
                |State(plugin): State<Arc<ShibbolethAuthPlugin>>,
                 headers: HeaderMap,
                 extensions: Extensions,
                 Path((_context, name)): Path<(String, String)>,
                 Query(query): Query<ManageQuery>,
                 body: Result<Json<serde_json::Value>, JsonRejection>| async move {
                    check_plugin(&plugin, &name)?;
                    let Json(input) = body.map_err(map_json_rejection)?;
                    let scope = admin_scope(&headers, &extensions);
                    let request = ManageRequest { save: true, input };
                    let reply = plugin.manage(verb(&query)?, &request, scope)?;
                    Ok::<Json<JsonMessage>, DogAxumError>(Json(reply))
                },
            ),
        )
        .with_state(plugin)
}
