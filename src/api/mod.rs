use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::search::SearchService;

pub mod handlers;
pub mod models;

pub fn create_router(service: Arc<SearchService>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/search", post(handlers::search_handler))
        .with_state(service)
        .layer(cors)
}
