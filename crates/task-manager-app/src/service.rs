//! Task use cases on top of a [`TaskStore`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use task_manager_core::id::TaskId;
use task_manager_core::{Task, TaskDraft, TaskQuery};
use time::OffsetDateTime;
use tracing::debug;

use crate::task_store::TaskStore;

/// Outward-facing representation of a task, with the status rendered by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    /// Task identifier.
    pub id: TaskId,
    /// Human-readable title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Status name, e.g. `"InProgress"`.
    pub status: String,
    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Time of the latest update, absent until the first one.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub updated_at: Option<OffsetDateTime>,
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            title: task.title,
            description: task.description,
            status: task.status.as_str().to_owned(),
            created_at: task.created_at,
            updated_at: task.updated_at,
        }
    }
}

/// Service façade that encapsulates all task-related side effects.
///
/// Holds no state besides the injected store.
pub struct TaskService<S> {
    store: S,
}

impl<S> TaskService<S> {
    /// Construct a service over `store`.
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Expose a reference to the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }
}

impl<S: TaskStore> TaskService<S> {
    /// List tasks matching `query`, filtered and ordered.
    ///
    /// # Errors
    /// Returns an error if the store cannot load the collection.
    pub fn list_tasks(&self, query: &TaskQuery) -> Result<Vec<TaskView>> {
        let tasks = self
            .store
            .load_all()
            .map_err(Into::<anyhow::Error>::into)
            .context("failed to load tasks")?;
        let total = tasks.len();
        let views: Vec<TaskView> = query.apply(tasks).into_iter().map(TaskView::from).collect();
        debug!(total, matched = views.len(), ?query, "Listed tasks");
        Ok(views)
    }

    /// Fetch a single task.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn get_task(&self, id: TaskId) -> Result<Option<TaskView>> {
        let task = self
            .store
            .get(id)
            .map_err(Into::<anyhow::Error>::into)
            .with_context(|| format!("failed to load task {id}"))?;
        Ok(task.map(TaskView::from))
    }

    /// Create a task from client-supplied fields.
    ///
    /// # Errors
    /// Returns an error if the store cannot persist the task.
    pub fn create_task(&self, draft: TaskDraft) -> Result<TaskView> {
        let task = self
            .store
            .add(draft)
            .map_err(Into::<anyhow::Error>::into)
            .context("failed to create task")?;
        debug!(id = %task.id, "Created task");
        Ok(task.into())
    }

    /// Replace title, description, and status of an existing task.
    ///
    /// Returns `Ok(None)` without writing when the task does not exist.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn update_task(&self, id: TaskId, draft: TaskDraft) -> Result<Option<TaskView>> {
        let Some(mut task) = self
            .store
            .get(id)
            .map_err(Into::<anyhow::Error>::into)
            .with_context(|| format!("failed to load task {id}"))?
        else {
            debug!(%id, "Update requested for unknown task");
            return Ok(None);
        };
        task.apply(draft);

        let updated = self
            .store
            .update(&task)
            .map_err(Into::<anyhow::Error>::into)
            .with_context(|| format!("failed to update task {id}"))?;
        Ok(updated.map(TaskView::from))
    }

    /// Delete a task, returning whether it existed.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or written.
    pub fn delete_task(&self, id: TaskId) -> Result<bool> {
        self.store
            .delete(id)
            .map_err(Into::<anyhow::Error>::into)
            .with_context(|| format!("failed to delete task {id}"))
    }
}
