//! Path extractor for UUID identifiers.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

/// Pulls the single path parameter and parses it as a UUID.
///
/// A path segment that is not a UUID never reaches the handler; the request
/// is rejected with a 400 and the standard JSON error body.
///
/// ```ignore
/// use axum_helpers::extractors::UuidPath;
///
/// async fn get_task(UuidPath(id): UuidPath) -> String {
///     format!("Task ID: {}", id)
/// }
///
/// let app = Router::new().route("/tasks/{id}", get(get_task));
/// ```
pub struct UuidPath(pub Uuid);

impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(IntoResponse::into_response)?;

        let id = Uuid::parse_str(&raw)
            .map_err(|_| AppError::BadRequest(format!("Invalid UUID: {}", raw)).into_response())?;

        Ok(UuidPath(id))
    }
}
