use std::any::Any;

use axum::{
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

use super::middleware::{audit_middleware, require_admin};
use super::state::AppState;
use super::types::Envelope;
use super::{admin, public};

/// Create the full router with application state
///
/// Routes are registered under their full `/api/{version}` path so the audit
/// layer records the path the client actually requested.
pub fn create_router(state: AppState) -> Router {
    let prefix = state.api_prefix();

    let public = Router::new()
        .route(&format!("{prefix}/public/health"), get(public::health_check))
        .route(&format!("{prefix}/public/version"), get(public::get_version))
        .route(&format!("{prefix}/public/resume"), get(public::get_resume))
        .route(&format!("{prefix}/public/contacts"), post(public::submit_contact));

    let admin = Router::new()
        .route(&format!("{prefix}/admin/stats"), get(admin::get_stats))
        .route(&format!("{prefix}/admin/contacts"), get(admin::list_contacts))
        .route(
            &format!("{prefix}/admin/contacts/requests"),
            get(admin::list_contact_requests),
        )
        .route_layer(from_fn_with_state(state.clone(), require_admin));

    let routes = public
        .merge(admin)
        .fallback(route_not_found)
        .method_not_allowed_fallback(method_not_allowed);

    with_pipeline(routes, state)
}

async fn route_not_found() -> Envelope {
    Envelope::client_error(StatusCode::NOT_FOUND, "Not Found")
}

async fn method_not_allowed() -> Envelope {
    Envelope::client_error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

/// Wrap routes in the request pipeline
///
/// Outermost first: tracing, audit logging, panic recovery.
pub(crate) fn with_pipeline(routes: Router<AppState>, state: AppState) -> Router {
    routes
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(from_fn_with_state(state.clone(), audit_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    error!(panic = %detail, "Handler panicked");

    Envelope::internal_error().into_response()
}
