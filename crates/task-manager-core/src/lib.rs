//! Domain types & query engine for task-manager.

/// Identifier types.
pub mod id;
/// In-memory filtering and ordering of task collections.
pub mod query;
/// Task lifecycle status.
pub mod status;

use crate::id::TaskId;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub use crate::query::{SortDirection, SortKey, TaskOrder, TaskQuery};
pub use crate::status::{ParseStatusError, TaskStatus};

/// A tracked unit of work as persisted in the backing file.
///
/// Keys are written in PascalCase so existing `tasks.json` files stay readable;
/// camelCase keys are accepted on input as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier assigned at creation.
    #[serde(rename = "Id", alias = "id")]
    pub id: TaskId,
    /// Human-readable title.
    #[serde(rename = "Title", alias = "title")]
    pub title: String,
    /// Free-form description.
    #[serde(rename = "Description", alias = "description")]
    pub description: String,
    /// Current lifecycle status.
    #[serde(rename = "Status", alias = "status")]
    pub status: TaskStatus,
    /// Creation time in UTC.
    #[serde(rename = "CreatedAt", alias = "createdAt", with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Time of the latest update in UTC; `None` until the first update.
    #[serde(
        rename = "UpdatedAt",
        alias = "updatedAt",
        default,
        with = "time::serde::rfc3339::option"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

/// Client-controlled fields of a task.
///
/// Used for both creation and updates; identifier and timestamps are always
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Human-readable title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Requested status.
    pub status: TaskStatus,
}

impl TaskDraft {
    /// Build a draft from its three fields.
    pub fn new(title: impl Into<String>, description: impl Into<String>, status: TaskStatus) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            status,
        }
    }
}

impl Task {
    /// Materialize a new task from `draft` with a fresh identifier.
    #[must_use]
    pub fn create(draft: TaskDraft, created_at: OffsetDateTime) -> Self {
        let TaskDraft {
            title,
            description,
            status,
        } = draft;
        Self {
            id: TaskId::new(),
            title,
            description,
            status,
            created_at,
            updated_at: None,
        }
    }

    /// Overwrite the mutable fields with the contents of `draft`.
    pub fn apply(&mut self, draft: TaskDraft) {
        self.title = draft.title;
        self.description = draft.description;
        self.status = draft.status;
    }

    /// Copy the mutable fields from another task record.
    pub fn apply_from(&mut self, other: &Self) {
        self.title.clone_from(&other.title);
        self.description.clone_from(&other.description);
        self.status = other.status;
    }

    /// Stamp an update at `now`.
    ///
    /// The stamp never moves backwards: it is clamped to the previous update
    /// time (or the creation time for the first update).
    pub fn touch(&mut self, now: OffsetDateTime) {
        let floor = self.updated_at.unwrap_or(self.created_at);
        self.updated_at = Some(now.max(floor));
    }
}
