//! In-memory [`TaskStore`] backend.

use std::convert::Infallible;
use std::sync::{Mutex, MutexGuard, PoisonError};

use task_manager_core::id::TaskId;
use task_manager_core::{Task, TaskDraft};
use time::OffsetDateTime;
use tracing::debug;

use crate::task_store::TaskStore;

/// Volatile store with the same semantics as the JSON file store.
///
/// Useful for tests and for running the server without touching the disk.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tasks: Mutex<Vec<Task>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `tasks`, kept as-is (identifiers and timestamps included).
    #[must_use]
    pub const fn with_tasks(tasks: Vec<Task>) -> Self {
        Self {
            tasks: Mutex::new(tasks),
        }
    }

    /// Number of stored tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    /// Returns true when no task is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<Task>> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TaskStore for MemoryStore {
    type Error = Infallible;

    fn load_all(&self) -> Result<Vec<Task>, Self::Error> {
        Ok(self.guard().clone())
    }

    fn get(&self, id: TaskId) -> Result<Option<Task>, Self::Error> {
        Ok(self.guard().iter().find(|task| task.id == id).cloned())
    }

    fn add(&self, draft: TaskDraft) -> Result<Task, Self::Error> {
        let task = Task::create(draft, OffsetDateTime::now_utc());
        self.guard().push(task.clone());
        debug!(id = %task.id, "Added task in memory");
        Ok(task)
    }

    fn update(&self, task: &Task) -> Result<Option<Task>, Self::Error> {
        let mut tasks = self.guard();
        let Some(existing) = tasks.iter_mut().find(|candidate| candidate.id == task.id) else {
            return Ok(None);
        };
        existing.apply_from(task);
        existing.touch(OffsetDateTime::now_utc());
        Ok(Some(existing.clone()))
    }

    fn delete(&self, id: TaskId) -> Result<bool, Self::Error> {
        let mut tasks = self.guard();
        let before = tasks.len();
        tasks.retain(|task| task.id != id);
        Ok(tasks.len() != before)
    }
}
