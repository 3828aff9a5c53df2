pub mod config;
pub mod dispatch;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod storage;
pub mod types;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use config::Config;
use handlers::AppState;

pub fn router(state: Arc<AppState>, config: &Config) -> Router {
    let uploads = ServeDir::new(state.uploads.dir());

    Router::new()
        .route("/api/status", get(handlers::status))
        .route("/api/send-voice", post(handlers::send_voice))
        .nest_service("/uploads", uploads)
        .fallback_service(ServeDir::new(&config.public_dir))
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
