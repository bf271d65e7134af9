use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

pub mod error;
pub mod pipeline;
pub mod rest;

pub use error::ApiError;
pub use pipeline::{Analysis, AnalysisPipeline};

pub struct AppState {
    pub pipeline: AnalysisPipeline,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(rest::api_welcome))
        .route("/predict", post(rest::api_predict))
        .route("/store_demographics", post(rest::api_store_demographics))
        .route("/final_prediction", post(rest::api_final_prediction))
        .with_state(state)
        // CORS
        .layer(
            tower_http::cors::CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        )
        // Logging layer: method + path only
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}
