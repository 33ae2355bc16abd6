use axum::{
    http::{self, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::handlers;
use super::state::AppState;

/// Build the HTTP surface: health probe plus the two prediction endpoints.
pub fn create_router(state: AppState) -> Router {
    let cors_layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([http::header::CONTENT_TYPE])
        .allow_origin(AllowOrigin::any());

    Router::new()
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .route("/classify", post(handlers::classify))
        .layer(cors_layer)
        .with_state(state)
}
