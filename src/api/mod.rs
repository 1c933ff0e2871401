//! API layer - HTTP handlers and routing
//!
//! All endpoints live under `/api`; uploaded avatars are served statically
//! from `/uploads`. CORS is restricted to the configured frontend origin.

pub mod auth;
pub mod availability;
pub mod directory;
pub mod middleware;
pub mod notifications;
pub mod responses;
pub mod sessions;
pub mod site;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub use middleware::{ApiError, AppState};

/// Build the `/api` router
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(directory::router())
        .merge(sessions::router())
        .merge(notifications::router())
        .merge(availability::router())
        .merge(site::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(
            cors_origin
                .parse::<HeaderValue>()
                .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000")),
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    Router::new()
        .nest("/api", build_api_router())
        .nest_service("/uploads", ServeDir::new(&state.upload_config.path))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
