//! Storage abstraction used by [`crate::service::TaskService`].

use anyhow::Error;
use task_manager_core::id::TaskId;
use task_manager_core::{Task, TaskDraft};
use task_manager_store_json::{JsonFileStore, JsonStoreError};

/// Minimal storage abstraction required by [`crate::service::TaskService`].
///
/// Implementations own the whole task collection and must serialize their own
/// access: every method is called through a shared reference from any thread.
pub trait TaskStore {
    /// Error type bubbled up from the backing store.
    type Error: Into<Error>;

    /// Load every task in storage order.
    ///
    /// # Errors
    /// Returns a store-specific error when the collection cannot be read.
    fn load_all(&self) -> Result<Vec<Task>, Self::Error>;

    /// Find a task by identifier.
    ///
    /// The default implementation scans [`load_all`](Self::load_all).
    ///
    /// # Errors
    /// Returns a store-specific error when the collection cannot be read.
    fn get(&self, id: TaskId) -> Result<Option<Task>, Self::Error> {
        Ok(self.load_all()?.into_iter().find(|task| task.id == id))
    }

    /// Persist a new task, assigning its identifier and creation time.
    ///
    /// # Errors
    /// Returns a store-specific error when persisting fails.
    fn add(&self, draft: TaskDraft) -> Result<Task, Self::Error>;

    /// Overwrite the mutable fields of the stored task with `task.id` and stamp the update.
    ///
    /// Returns `Ok(None)` without writing when the task does not exist.
    ///
    /// # Errors
    /// Returns a store-specific error when persisting fails.
    fn update(&self, task: &Task) -> Result<Option<Task>, Self::Error>;

    /// Remove a task, returning whether it existed.
    ///
    /// # Errors
    /// Returns a store-specific error when persisting fails.
    fn delete(&self, id: TaskId) -> Result<bool, Self::Error>;
}

impl TaskStore for JsonFileStore {
    type Error = JsonStoreError;

    fn load_all(&self) -> Result<Vec<Task>, Self::Error> {
        Self::load_all(self)
    }

    fn get(&self, id: TaskId) -> Result<Option<Task>, Self::Error> {
        Self::get(self, id)
    }

    fn add(&self, draft: TaskDraft) -> Result<Task, Self::Error> {
        Self::add(self, draft)
    }

    fn update(&self, task: &Task) -> Result<Option<Task>, Self::Error> {
        Self::update(self, task)
    }

    fn delete(&self, id: TaskId) -> Result<bool, Self::Error> {
        Self::delete(self, id)
    }
}

impl<S> TaskStore for &S
where
    S: TaskStore + ?Sized,
{
    type Error = S::Error;

    fn load_all(&self) -> Result<Vec<Task>, Self::Error> {
        (*self).load_all()
    }

    fn get(&self, id: TaskId) -> Result<Option<Task>, Self::Error> {
        (*self).get(id)
    }

    fn add(&self, draft: TaskDraft) -> Result<Task, Self::Error> {
        (*self).add(draft)
    }

    fn update(&self, task: &Task) -> Result<Option<Task>, Self::Error> {
        (*self).update(task)
    }

    fn delete(&self, id: TaskId) -> Result<bool, Self::Error> {
        (*self).delete(id)
    }
}

impl<S> TaskStore for std::sync::Arc<S>
where
    S: TaskStore + ?Sized,
{
    type Error = S::Error;

    fn load_all(&self) -> Result<Vec<Task>, Self::Error> {
        (**self).load_all()
    }

    fn get(&self, id: TaskId) -> Result<Option<Task>, Self::Error> {
        (**self).get(id)
    }

    fn add(&self, draft: TaskDraft) -> Result<Task, Self::Error> {
        (**self).add(draft)
    }

    fn update(&self, task: &Task) -> Result<Option<Task>, Self::Error> {
        (**self).update(task)
    }

    fn delete(&self, id: TaskId) -> Result<bool, Self::Error> {
        (**self).delete(id)
    }
}
