//! JSON body extractor that validates after deserializing.

use crate::errors::{AppError, ErrorResponse};
use axum::{
    extract::{FromRequest, Json, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Deserialize the body, then run the `validator` rules over it.
///
/// Either failure rejects with a 400. Bodies that do not deserialize at all
/// (malformed JSON, unknown enum values, wrong types) carry the parser's
/// message; rule violations carry per-field details instead.
///
/// ```ignore
/// use axum_helpers::extractors::ValidatedJson;
/// use serde::Deserialize;
/// use validator::Validate;
///
/// #[derive(Deserialize, Validate)]
/// struct CreateTask {
///     #[validate(length(min = 1, max = 255))]
///     title: String,
/// }
///
/// async fn create_task(ValidatedJson(payload): ValidatedJson<CreateTask>) -> String {
///     payload.title
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

/// Field name to list of `{code, message}` objects.
fn validation_details(errors: &validator::ValidationErrors) -> serde_json::Value {
    let mut fields = serde_json::Map::new();
    for (field, issues) in errors.field_errors() {
        let list: Vec<_> = issues
            .iter()
            .map(|issue| {
                serde_json::json!({
                    "code": issue.code,
                    "message": issue.message,
                })
            })
            .collect();
        fields.insert(field.to_string(), serde_json::Value::Array(list));
    }
    serde_json::Value::Object(fields)
}

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()).into_response())?;

        if let Err(errors) = data.validate() {
            let body = ErrorResponse {
                error: "BadRequest".to_string(),
                message: "Request validation failed".to_string(),
                details: Some(validation_details(&errors)),
            };
            return Err((StatusCode::BAD_REQUEST, axum::Json(body)).into_response());
        }

        Ok(ValidatedJson(data))
    }
}
