//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP API endpoints:
//! - Auth endpoint (identity token exchange)
//! - Notes endpoints (per-user CRUD)
//! - Health endpoint

pub mod auth;
pub mod middleware;
pub mod notes;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use middleware::{ApiError, AppState, AuthenticatedUser};

/// GET /health - Liveness probe
///
/// Pings the database so a wedged pool shows up as unhealthy.
async fn health(State(state): State<AppState>) -> Result<Json<serde_json::Value>, ApiError> {
    state.pool.ping().await.map_err(|e| {
        tracing::error!("health check ping failed: {:#}", e);
        ApiError::internal_error("Database unavailable")
    })?;

    Ok(Json(serde_json::json!({"status": "ok"})))
}

/// Build the main API router
pub fn build_api_router(state: AppState) -> Router<AppState> {
    // Notes routes (need a valid session)
    let notes_routes = Router::new()
        .route(
            "/notes",
            get(notes::list_notes)
                .post(notes::create_note)
                .put(notes::update_note)
                .delete(notes::delete_note),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state,
            middleware::require_session,
        ));

    // Public routes
    Router::new()
        .route("/auth", post(auth::login))
        .route("/health", get(health))
        .merge(notes_routes)
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let mut router = Router::new().merge(build_api_router(state.clone()));

    // CORS with credentials so the session cookie travels cross-origin
    if let Ok(origin) = cors_origin.parse::<HeaderValue>() {
        let cors = CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true);
        router = router.layer(cors);
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}
