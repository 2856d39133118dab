//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::{auth_middleware, track_metrics};
use crate::startup::AppState;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_routes(state.clone()))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .layer(middleware::from_fn(track_metrics))
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// API v1 routes (protected)
fn api_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(service_routes())
        .merge(post_routes())
        .merge(taxonomy_routes())
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Service routes
fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/services", post(handlers::service::create_service))
        .route(
            "/services/{id}",
            get(handlers::service::get_service)
                .put(handlers::service::update_service)
                .delete(handlers::service::delete_service),
        )
        .route(
            "/services/{id}/translations",
            post(handlers::service::sync_locale),
        )
        .route(
            "/services/{id}/images/propagate",
            post(handlers::service::propagate_images),
        )
}

/// Post routes
fn post_routes() -> Router<AppState> {
    Router::new()
        .route("/posts", post(handlers::post::create_post))
        .route(
            "/posts/{id}",
            get(handlers::post::get_post)
                .put(handlers::post::update_post)
                .delete(handlers::post::delete_post),
        )
}

/// Tag and category routes
fn taxonomy_routes() -> Router<AppState> {
    Router::new()
        .route("/tags", post(handlers::taxonomy::create_tag))
        .route("/tags/{id}", delete(handlers::taxonomy::delete_tag))
        .route("/categories", post(handlers::taxonomy::create_category))
        .route(
            "/categories/{id}",
            delete(handlers::taxonomy::delete_category),
        )
}
