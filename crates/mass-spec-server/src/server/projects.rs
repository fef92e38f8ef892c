use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use sample_index::ProjectInfo;
use serde::Serialize;
use utoipa::ToSchema;

use crate::server::samples::{to_responses, SampleResponse};
use crate::server::ServerState;

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub name: String,
    pub description: String,
}

impl From<ProjectInfo> for ProjectResponse {
    fn from(project: ProjectInfo) -> Self {
        Self {
            name: project.name,
            description: project.description,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSamplesResponse {
    pub project: String,
    pub count: usize,
    pub samples: Vec<SampleResponse>,
}

#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "projects",
    responses(
        (status = 200, body = [ProjectResponse]),
    )
)]
pub(crate) async fn list_projects(
    State(state): State<Arc<ServerState>>,
) -> Json<Vec<ProjectResponse>> {
    Json(
        state
            .index
            .projects()
            .into_iter()
            .map(ProjectResponse::from)
            .collect(),
    )
}

/// Unknown projects yield an empty list.
#[utoipa::path(
    get,
    path = "/api/projects/{name}/samples",
    tag = "projects",
    params(("name" = String, Path, description = "Project name")),
    responses(
        (status = 200, body = ProjectSamplesResponse),
    )
)]
pub(crate) async fn project_samples(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> Json<ProjectSamplesResponse> {
    let samples = to_responses(state.index.samples_in_project(&name));
    Json(ProjectSamplesResponse {
        project: name,
        count: samples.len(),
        samples,
    })
}
