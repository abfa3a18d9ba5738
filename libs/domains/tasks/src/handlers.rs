//! HTTP surface for the task resource.

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};
use axum_helpers::{UuidPath, ValidatedJson};
use std::sync::Arc;
use utoipa::OpenApi;
use uuid::Uuid;

use crate::error::TaskResult;
use crate::models::{CreateTask, Task, UpdateTask};
use crate::repository::TaskRepository;
use crate::service::TaskService;

/// OpenAPI schema covering every task endpoint.
#[derive(OpenApi)]
#[openapi(
    paths(list_tasks, get_task, create_task, update_task, delete_task),
    components(schemas(Task, CreateTask, UpdateTask)),
    tags(
        (name = "tasks", description = "Task CRUD with status change notifications")
    )
)]
pub struct ApiDoc;

/// Routes for the task resource, meant to be nested under `/api/tasks`.
pub fn router<R: TaskRepository + 'static>(service: TaskService<R>) -> Router {
    let svc = Arc::new(service);

    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route(
            "/{id}",
            get(get_task).put(update_task).delete(delete_task),
        )
        .with_state(svc)
}

/// All tasks, oldest first
#[utoipa::path(
    get,
    path = "",
    tag = "tasks",
    responses(
        (status = 200, description = "Every stored task", body = Vec<Task>),
        (status = 500, description = "Storage failure")
    )
)]
async fn list_tasks<R: TaskRepository>(
    State(svc): State<Arc<TaskService<R>>>,
) -> TaskResult<Json<Vec<Task>>> {
    Ok(Json(svc.list_tasks().await?))
}

/// Fetch one task
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "tasks",
    params(
        ("id" = Uuid, Path, description = "Task id")
    ),
    responses(
        (status = 200, description = "The requested task", body = Task),
        (status = 400, description = "Malformed task id"),
        (status = 404, description = "No task with this id"),
        (status = 500, description = "Storage failure")
    )
)]
async fn get_task<R: TaskRepository>(
    State(svc): State<Arc<TaskService<R>>>,
    UuidPath(id): UuidPath,
) -> TaskResult<Json<Task>> {
    Ok(Json(svc.get_task(id).await?))
}

/// Store a new task
#[utoipa::path(
    post,
    path = "",
    tag = "tasks",
    request_body = CreateTask,
    responses(
        (status = 201, description = "Task stored", body = Task),
        (status = 400, description = "Body failed validation"),
        (status = 500, description = "Storage failure")
    )
)]
async fn create_task<R: TaskRepository>(
    State(svc): State<Arc<TaskService<R>>>,
    ValidatedJson(input): ValidatedJson<CreateTask>,
) -> TaskResult<impl IntoResponse> {
    let created = svc.create_task(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Replace a task's mutable fields
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "tasks",
    params(
        ("id" = Uuid, Path, description = "Task id")
    ),
    request_body = UpdateTask,
    responses(
        (status = 204, description = "Task replaced"),
        (status = 400, description = "Malformed id or body failed validation"),
        (status = 404, description = "No task with this id"),
        (status = 500, description = "Storage failure")
    )
)]
async fn update_task<R: TaskRepository>(
    State(svc): State<Arc<TaskService<R>>>,
    UuidPath(id): UuidPath,
    ValidatedJson(input): ValidatedJson<UpdateTask>,
) -> TaskResult<StatusCode> {
    svc.update_task(id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Remove a task
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "tasks",
    params(
        ("id" = Uuid, Path, description = "Task id")
    ),
    responses(
        (status = 204, description = "Task removed"),
        (status = 400, description = "Malformed task id"),
        (status = 404, description = "No task with this id"),
        (status = 500, description = "Storage failure")
    )
)]
async fn delete_task<R: TaskRepository>(
    State(svc): State<Arc<TaskService<R>>>,
    UuidPath(id): UuidPath,
) -> TaskResult<StatusCode> {
    svc.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
