use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use sample_index::{GraphRef, SampleRecord};
use serde::Serialize;
use utoipa::ToSchema;

use crate::server::error::{ApiError, ApiErrorResponse};
use crate::server::ServerState;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GraphResponse {
    pub label: String,
    pub location_uri: String,
    /// File category: image, vector, document or table.
    pub kind: String,
    pub is_main: bool,
    pub extension: String,
    pub file_name: String,
}

impl From<GraphRef> for GraphResponse {
    fn from(graph: GraphRef) -> Self {
        Self {
            label: graph.label,
            location_uri: graph.location,
            kind: graph.kind.as_str().to_string(),
            is_main: graph.is_main,
            extension: graph.extension,
            file_name: graph.file_name,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SampleResponse {
    pub sample_id: String,
    pub project: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub has_multiple: bool,
    pub files: Vec<GraphResponse>,
}

impl From<SampleRecord> for SampleResponse {
    fn from(record: SampleRecord) -> Self {
        Self {
            sample_id: record.sample_id,
            project: record.project,
            description: record.description,
            created_at: record.created_at,
            has_multiple: record.has_multiple,
            files: record.files.into_iter().map(GraphResponse::from).collect(),
        }
    }
}

pub(crate) fn to_responses(records: Vec<SampleRecord>) -> Vec<SampleResponse> {
    records.into_iter().map(SampleResponse::from).collect()
}

#[utoipa::path(
    get,
    path = "/api/samples",
    tag = "samples",
    responses(
        (status = 200, body = [SampleResponse]),
    )
)]
pub(crate) async fn list_samples(
    State(state): State<Arc<ServerState>>,
) -> Json<Vec<SampleResponse>> {
    Json(to_responses(state.index.get_all()))
}

#[utoipa::path(
    get,
    path = "/api/samples/{id}",
    tag = "samples",
    params(("id" = String, Path, description = "Sample identifier")),
    responses(
        (status = 200, body = SampleResponse),
        (status = 404, body = ApiErrorResponse),
    )
)]
pub(crate) async fn get_sample(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> Result<Json<SampleResponse>, ApiError> {
    let record = state.index.get(&id)?;
    Ok(Json(record.into()))
}
