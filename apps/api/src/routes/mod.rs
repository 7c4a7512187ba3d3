pub mod analytics;
pub mod auth;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::state::AppState;

/// Success envelope shared by every API response body.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/analytics/:kind",
            get(analytics::handle_get_report),
        )
        .route(
            "/api/v1/analytics/:kind/preview",
            post(analytics::handle_preview_report),
        )
        .with_state(state)
}
