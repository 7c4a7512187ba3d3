//! Axum route handlers for the Analytics API.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::analytics::{assemble_report, AnalyticsReport, Benchmarks, ReportKind, TrackedRecord};
use crate::errors::AppError;
use crate::routes::auth::AuthUser;
use crate::routes::ApiResponse;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// RFC 3339 override for the reference time. Defaults to the current time.
    pub now: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PreviewRequest {
    pub records: Vec<TrackedRecord>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/analytics/:kind
///
/// Loads the caller's records and returns the report for `kind`.
pub async fn handle_get_report(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(kind): Path<String>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<ApiResponse<AnalyticsReport>>, AppError> {
    let kind = parse_kind(&kind)?;
    let now = resolve_now(query.now.as_deref())?;

    let records = state.store.fetch_records(user_id, kind).await?;
    info!("Building {kind} report for user {user_id} from {} records", records.len());

    let report = run_report(records, kind, now, state.config.benchmarks.clone()).await?;
    Ok(Json(ApiResponse::ok(
        format!("{} analytics retrieved", capitalize(kind.as_str())),
        report,
    )))
}

/// POST /api/v1/analytics/:kind/preview
///
/// Computes a report from records supplied in the body. Nothing is stored.
pub async fn handle_preview_report(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(kind): Path<String>,
    body: Result<Json<PreviewRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AnalyticsReport>>, AppError> {
    let kind = parse_kind(&kind)?;
    let Json(request) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let now = request.now.unwrap_or_else(Utc::now);

    let report = run_report(request.records, kind, now, state.config.benchmarks.clone()).await?;
    Ok(Json(ApiResponse::ok(
        format!("{} analytics preview computed", capitalize(kind.as_str())),
        report,
    )))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn parse_kind(raw: &str) -> Result<ReportKind, AppError> {
    raw.parse::<ReportKind>().map_err(AppError::NotFound)
}

fn resolve_now(raw: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    match raw {
        None => Ok(Utc::now()),
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| AppError::Validation(format!("now must be an RFC 3339 timestamp: {e}"))),
    }
}

/// The engine is CPU-bound; keep large snapshots off the async workers.
async fn run_report(
    records: Vec<TrackedRecord>,
    kind: ReportKind,
    now: DateTime<Utc>,
    benchmarks: Benchmarks,
) -> Result<AnalyticsReport, AppError> {
    let report = tokio::task::spawn_blocking(move || assemble_report(&records, kind, now, &benchmarks))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("report task failed: {e}")))??;
    Ok(report)
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().to_string() + chars.as_str(),
    }
}
