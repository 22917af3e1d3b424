//! Unified HTTP error type.
//!
//! Handlers return `Result<T, ServerError>`. Client errors expose their
//! message; internal errors are logged in full and answered with a generic
//! body so file paths never reach the caller.

use std::collections::BTreeMap;

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use task_manager_app::QueryBuildError;
use task_manager_core::id::TaskId;
use thiserror::Error;
use tracing::error;
use validator::ValidationErrors;

/// Field name to the messages describing why it was rejected.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Errors surfaced by the task routes.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The referenced task does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request was malformed or failed validation.
    #[error("bad request: {message}")]
    BadRequest {
        /// Summary returned as `message`.
        message: String,
        /// Per-field details returned as `errors`.
        errors: Option<FieldErrors>,
    },

    /// Storage or runtime failure.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a FieldErrors>,
}

impl ServerError {
    /// Not-found error for a task identifier.
    #[must_use]
    pub fn task_not_found(id: TaskId) -> Self {
        Self::NotFound(format!("Task {id} not found"))
    }

    /// Bad request without field details.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            errors: None,
        }
    }

    /// Bad request blaming a single field.
    #[must_use]
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self::BadRequest {
            errors: Some(BTreeMap::from([(field.into(), vec![message.clone()])])),
            message,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match &self {
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message.as_str(), None),
            Self::BadRequest { message, errors } => {
                (StatusCode::BAD_REQUEST, message.as_str(), errors.as_ref())
            }
            Self::Internal(message) => {
                error!(%message, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error",
                    None,
                )
            }
        };
        (status, Json(ErrorBody { message, errors })).into_response()
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(e: anyhow::Error) -> Self {
        // Logged once in `into_response`, with the whole chain.
        Self::Internal(format!("{e:#}"))
    }
}

impl From<QueryBuildError> for ServerError {
    fn from(e: QueryBuildError) -> Self {
        Self::invalid_field(e.field(), e.to_string())
    }
}

impl From<ValidationErrors> for ServerError {
    fn from(e: ValidationErrors) -> Self {
        let errors = e
            .field_errors()
            .into_iter()
            .map(|(field, failures)| {
                let messages = failures
                    .iter()
                    .map(|failure| {
                        failure
                            .message
                            .as_ref()
                            .map_or_else(|| failure.code.to_string(), ToString::to_string)
                    })
                    .collect();
                (field.to_string(), messages)
            })
            .collect();
        Self::BadRequest {
            message: "One or more validation errors occurred.".to_owned(),
            errors: Some(errors),
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(e: JsonRejection) -> Self {
        Self::bad_request(e.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(e: QueryRejection) -> Self {
        Self::bad_request(e.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, anyhow};
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "too short"))]
        title: String,
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = Err::<(), _>(anyhow!("permission denied: /srv/Data/tasks.json"))
            .context("failed to load tasks")
            .map_err(ServerError::from);
        let Err(ServerError::Internal(detail)) = err else {
            panic!("expected internal error");
        };
        assert!(detail.contains("tasks.json"));

        let response = ServerError::Internal(detail).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn validation_errors_are_grouped_by_field() {
        let sample = Sample { title: "ab".into() };
        let Err(errors) = sample.validate() else {
            panic!("expected validation failure");
        };
        let ServerError::BadRequest { errors, .. } = ServerError::from(errors) else {
            panic!("expected bad request");
        };
        let errors = errors.unwrap_or_else(|| panic!("field errors expected"));
        assert_eq!(errors.get("title"), Some(&vec!["too short".to_owned()]));
    }

    #[test]
    fn not_found_names_the_task() {
        let id = TaskId::new();
        let err = ServerError::task_not_found(id);
        assert!(err.to_string().contains(&id.to_string()));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
