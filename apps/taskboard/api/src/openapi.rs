//! Top-level OpenAPI document assembly.

use utoipa::OpenApi;

/// Combined schema for everything served under `/api`.
#[derive(OpenApi)]
#[openapi(
    components(
        schemas(axum_helpers::ErrorResponse)
    ),
    info(
        title = "Taskboard API",
        version = "0.1.0",
        description = "Task tracking with email notifications on status changes"
    ),
    servers(
        (url = "/api", description = "Primary mount point")
    ),
    nest(
        (path = "/tasks", api = domain_tasks::ApiDoc)
    ),
    tags(
        (name = "tasks", description = "Task CRUD with status change notifications")
    )
)]
pub struct ApiDoc;
