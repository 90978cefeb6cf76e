//! Application routing
//!
//! This module defines all HTTP routes for the application.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderName, Method},
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{analyze, health};
use crate::middleware::{
    auth::{require_session, AuthState},
    logging::{log_request, REQUEST_ID_HEADER, TRACE_ID_HEADER},
};
use crate::server::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // Health check routes (no authentication required)
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness))
        .route("/liveness", get(health::liveness));

    let auth_state = AuthState::new(state.settings.clone());

    // Both paths serve the same handler; the second matches the hosted
    // functions layout older clients still call.
    let analysis_routes = Router::new()
        .route("/analyze-xray", post(analyze::analyze_xray))
        .route("/functions/v1/analyze-xray", post(analyze::analyze_xray))
        .layer(middleware::from_fn_with_state(auth_state, require_session))
        .layer(DefaultBodyLimit::max(state.settings.max_body_bytes()));

    // Layer order: last added = outermost = runs first, so preflight is
    // answered by CORS before auth sees it
    Router::new()
        .merge(analysis_routes)
        .merge(health_routes)
        .layer(create_cors_layer())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Any origin; only the headers browser clients actually send
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            header::CONTENT_TYPE,
        ])
        .expose_headers([
            HeaderName::from_static(TRACE_ID_HEADER),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}
