use std::borrow::Cow;

use serde::Deserialize;
use task_manager_app::{QueryBuildError, TaskQueryBuilder};
use task_manager_core::{TaskDraft, TaskQuery, TaskStatus};
use validator::{Validate, ValidationError};

/// Body of `POST /api/tasks` and `PUT /api/tasks/{id}`.
///
/// Missing text fields decode as empty strings so that the length rules
/// report them per field; a missing status means `Pending`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    /// Short summary of the task.
    #[serde(default)]
    #[validate(length(
        min = 3,
        max = 200,
        message = "Title must be between 3 and 200 characters"
    ))]
    #[validate(custom(function = "not_blank"))]
    pub title: String,

    /// Free-form details.
    #[serde(default)]
    #[validate(length(
        min = 3,
        max = 1000,
        message = "Description must be between 3 and 1000 characters"
    ))]
    #[validate(custom(function = "not_blank"))]
    pub description: String,

    /// Lifecycle status; defaults to `Pending`.
    #[serde(default)]
    pub status: TaskStatus,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank")
            .with_message(Cow::Borrowed("Value must not be blank")));
    }
    Ok(())
}

impl From<TaskPayload> for TaskDraft {
    fn from(payload: TaskPayload) -> Self {
        Self::new(payload.title, payload.description, payload.status)
    }
}

/// Query string of `GET /api/tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTasksParams {
    /// Status name or ordinal to filter by.
    pub status: Option<String>,
    /// `title`, `status`, or `createdAt`.
    pub order_by: Option<String>,
    /// `asc` or `desc`.
    pub order_direction: Option<String>,
    /// Exclusive lower bound on the creation time.
    pub created_after: Option<String>,
    /// Exclusive upper bound on the creation time.
    pub created_before: Option<String>,
}

impl ListTasksParams {
    /// Convert raw parameters into a [`TaskQuery`].
    ///
    /// # Errors
    /// Returns an error naming the parameter whose value could not be parsed.
    pub fn into_query(self) -> Result<TaskQuery, QueryBuildError> {
        Ok(TaskQueryBuilder::new()
            .with_status(self.status)?
            .with_created_range(self.created_after, self.created_before)?
            .with_order(self.order_by.as_deref(), self.order_direction.as_deref())
            .build())
    }
}
