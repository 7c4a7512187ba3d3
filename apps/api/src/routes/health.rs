use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use tracing::warn;

use crate::state::AppState;

/// GET /health
/// Reports the service version and whether the record store answers.
/// Responds 503 while the store is unreachable.
pub async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let (code, status, store) = match state.store.ping().await {
        Ok(()) => (StatusCode::OK, "ok", "reachable"),
        Err(e) => {
            warn!("Record store health check failed: {e}");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unreachable")
        }
    };
    (
        code,
        Json(json!({
            "status": status,
            "store": store,
            "version": env!("CARGO_PKG_VERSION"),
            "service": "tracker-api"
        })),
    )
}
