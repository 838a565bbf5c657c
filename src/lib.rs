pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod storage;
pub mod submission;

use std::sync::Arc;

use axum::Router;
use axum::http::header;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::Config;
use crate::state::{AppState, SharedState};
use crate::storage::BlobStore;

pub fn build_app(store: Option<Arc<dyn BlobStore>>, config: Config) -> Router {
    let allow_origin = config.cors_allow_origin.clone();
    let static_dir = config.static_dir.clone();
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState { store, config });

    // The header layer sits outermost so every answer carries the CORS
    // header, static files and body-limit rejections included.
    Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(SetResponseHeaderLayer::overriding(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            allow_origin,
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
