use utoipa::OpenApi;

use crate::server::error::{ApiErrorBody, ApiErrorResponse};
use crate::server::projects::{ProjectResponse, ProjectSamplesResponse};
use crate::server::refresh::{RefreshResponse, StatusResponse};
use crate::server::samples::{GraphResponse, SampleResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mass Spec API",
        version = "0.1.0",
        description = "Index of mass-spectrometry result files grouped by sample"
    ),
    paths(
        crate::server::samples::list_samples,
        crate::server::samples::get_sample,
        crate::server::projects::list_projects,
        crate::server::projects::project_samples,
        crate::server::refresh::trigger_refresh,
        crate::server::refresh::import,
        crate::server::refresh::refresh_status,
    ),
    components(schemas(
        // Error
        ApiErrorResponse,
        ApiErrorBody,
        // Samples
        SampleResponse,
        GraphResponse,
        // Projects
        ProjectResponse,
        ProjectSamplesResponse,
        // Refresh
        RefreshResponse,
        StatusResponse,
    )),
    tags(
        (name = "samples", description = "Indexed samples"),
        (name = "projects", description = "Projects from the lab journal"),
        (name = "refresh", description = "Index rebuilds"),
    )
)]
pub struct ApiDoc;
