use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Returns a simple liveness object with the service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "ok": true,
        "service": "vitae-api",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
