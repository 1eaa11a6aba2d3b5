/// Health check endpoint for the deployment the gateway sits in
use crate::context::AppContext;
use axum::{response::Json, routing::get, Router};

/// Build health check routes
pub fn routes() -> Router<AppContext> {
    Router::new().route("/health", get(health_check))
}

/// Basic health check
///
/// Returns simple JSON with status and version
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
