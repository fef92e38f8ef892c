use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{DateTime, Utc};
use sample_index::{RefreshReport, RefreshStatus, RefreshTrigger};
use serde::Serialize;
use utoipa::ToSchema;

use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub ok: bool,
    pub generation: u64,
    pub sample_count: usize,
    pub file_count: usize,
    pub skipped_entries: usize,
    pub journal_loaded: bool,
    pub duration_ms: u64,
    pub finished_at: DateTime<Utc>,
}

impl From<RefreshReport> for RefreshResponse {
    fn from(report: RefreshReport) -> Self {
        Self {
            ok: true,
            generation: report.generation,
            sample_count: report.sample_count,
            file_count: report.file_count,
            skipped_entries: report.skipped_entries,
            journal_loaded: report.journal_loaded,
            duration_ms: report.duration_ms,
            finished_at: report.finished_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// One of idle, refreshing, ready or error.
    pub state: String,
    pub generation: u64,
    pub sample_count: usize,
    pub seen_entries: usize,
    pub indexed_files: usize,
    pub skipped_entries: usize,
    pub completed_refreshes: u64,
    pub failed_refreshes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    pub source: String,
}

impl From<RefreshStatus> for StatusResponse {
    fn from(status: RefreshStatus) -> Self {
        Self {
            state: status.state.as_str().to_string(),
            generation: status.generation,
            sample_count: status.sample_count,
            seen_entries: status.seen_entries,
            indexed_files: status.indexed_files,
            skipped_entries: status.skipped_entries,
            completed_refreshes: status.completed_refreshes,
            failed_refreshes: status.failed_refreshes,
            last_started_at: status.last_started_at,
            last_finished_at: status.last_finished_at,
            last_error: status.last_error,
            source: status.source,
        }
    }
}

/// Rebuilds the index and waits for the new generation to be published.
#[utoipa::path(
    post,
    path = "/api/refresh",
    tag = "refresh",
    responses(
        (status = 200, body = RefreshResponse),
        (status = 503, body = ApiErrorResponse),
        (status = 500, body = ApiErrorResponse),
    )
)]
pub(crate) async fn trigger_refresh(
    State(state): State<Arc<ServerState>>,
) -> Result<Json<RefreshResponse>, ApiError> {
    let report = state.controller.refresh(RefreshTrigger::OnDemand).await?;
    Ok(Json(report.into()))
}

#[utoipa::path(
    post,
    path = "/api/import",
    tag = "refresh",
    responses(
        (status = 200, body = RefreshResponse),
        (status = 503, body = ApiErrorResponse),
        (status = 500, body = ApiErrorResponse),
    )
)]
pub(crate) async fn import(
    state: State<Arc<ServerState>>,
) -> Result<Json<RefreshResponse>, ApiError> {
    trigger_refresh(state).await
}

#[utoipa::path(
    get,
    path = "/api/status",
    tag = "refresh",
    responses(
        (status = 200, body = StatusResponse),
    )
)]
pub(crate) async fn refresh_status(State(state): State<Arc<ServerState>>) -> Json<StatusResponse> {
    Json(state.controller.status().into())
}
