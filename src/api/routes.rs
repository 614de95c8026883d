use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Catalog
        .route("/datasets", get(handlers::dataset_status))
        .route("/datasets/reload", post(handlers::reload_datasets))
        // Queries
        .route("/developer/:developer", get(handlers::developer))
        .route("/userdata/:user_id", get(handlers::userdata))
        .route("/user_for_genre/:genre", get(handlers::user_for_genre))
        .route("/best_developer_year/:year", get(handlers::best_developer_year))
        .route(
            "/developer_reviews_analysis/:developer",
            get(handlers::developer_reviews_analysis),
        )
        .route("/recommendations/:item_id", get(handlers::recommendations))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
