//! HTTP API adapter: axum router, handlers, shared state, and error
//! mapping.

mod error;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::{ListParams, PredictResponse, UploadResponse};
pub use state::{AppState, State};

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

/// Build the application router.
#[must_use]
pub fn router(state: AppState) -> Router {
    let max_upload = state.max_upload_bytes;
    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/upload", post(routes::upload))
        .route("/records", get(routes::records))
        .route("/predict", post(routes::predict))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
}
