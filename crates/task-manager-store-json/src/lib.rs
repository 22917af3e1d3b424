//! JSON file storage implementation for task-manager.

mod error;

pub use error::{JsonStoreError, Result};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use task_manager_core::id::TaskId;
use task_manager_core::{Task, TaskDraft};
use tempfile::NamedTempFile;
use time::OffsetDateTime;
use tracing::{debug, info};

/// Name of the backing file inside the data directory.
pub const TASKS_FILE: &str = "tasks.json";

/// Storage holding the whole task collection as a JSON array in `<data_dir>/tasks.json`.
///
/// Every operation, reads included, runs under one exclusive lock for its full
/// read-modify-write cycle. Only one process may use a given file.
pub struct JsonFileStore {
    path: PathBuf,
    file: Mutex<TaskFile>,
}

/// The backing file. Only reachable through the store's lock guard.
struct TaskFile {
    path: PathBuf,
}

impl JsonFileStore {
    /// Open (or initialize) the store rooted at `data_dir`.
    ///
    /// Creates the directory when missing and seeds the file with `[]` when absent.
    ///
    /// # Errors
    /// Returns an error if the directory or initial file cannot be created.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let dir = data_dir.as_ref();
        fs::create_dir_all(dir).map_err(|source| JsonStoreError::io(dir, source))?;

        let path = dir.join(TASKS_FILE);
        let file = TaskFile { path: path.clone() };
        if !path.exists() {
            file.write(&[])?;
            info!(path = %path.display(), "Initialized empty task file");
        }
        info!(path = %path.display(), "Opened task file");

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(&self) -> Result<MutexGuard<'_, TaskFile>> {
        self.file.lock().map_err(|_| JsonStoreError::Lock)
    }

    /// Read every task in file order.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or is not a JSON array of tasks.
    pub fn load_all(&self) -> Result<Vec<Task>> {
        let file = self.lock()?;
        let tasks = file.read()?;
        debug!(count = tasks.len(), "Loaded tasks");
        Ok(tasks)
    }

    /// Find a single task by identifier.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn get(&self, id: TaskId) -> Result<Option<Task>> {
        let file = self.lock()?;
        let found = file.read()?.into_iter().find(|task| task.id == id);
        debug!(%id, found = found.is_some(), "Looked up task");
        Ok(found)
    }

    /// Persist a new task built from `draft` and return it.
    ///
    /// The identifier and creation time are generated here; the update stamp starts empty.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or rewritten.
    pub fn add(&self, draft: TaskDraft) -> Result<Task> {
        let file = self.lock()?;
        let mut tasks = file.read()?;

        let task = Task::create(draft, OffsetDateTime::now_utc());
        tasks.push(task.clone());
        file.write(&tasks)?;

        info!(id = %task.id, "Added task");
        Ok(task)
    }

    /// Overwrite title, description, and status of the stored task with `task.id`.
    ///
    /// Returns `None` without touching the file when no such task exists.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or rewritten.
    pub fn update(&self, task: &Task) -> Result<Option<Task>> {
        let file = self.lock()?;
        let mut tasks = file.read()?;

        let Some(existing) = tasks.iter_mut().find(|candidate| candidate.id == task.id) else {
            debug!(id = %task.id, "Update skipped, task not found");
            return Ok(None);
        };
        existing.apply_from(task);
        existing.touch(OffsetDateTime::now_utc());
        let updated = existing.clone();
        file.write(&tasks)?;

        info!(id = %updated.id, "Updated task");
        Ok(Some(updated))
    }

    /// Remove the task with `id`, returning whether anything was removed.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or rewritten.
    pub fn delete(&self, id: TaskId) -> Result<bool> {
        let file = self.lock()?;
        let mut tasks = file.read()?;

        let Some(index) = tasks.iter().position(|task| task.id == id) else {
            debug!(%id, "Delete skipped, task not found");
            return Ok(false);
        };
        tasks.remove(index);
        file.write(&tasks)?;

        info!(%id, "Deleted task");
        Ok(true)
    }
}

impl TaskFile {
    fn read(&self) -> Result<Vec<Task>> {
        let contents =
            fs::read_to_string(&self.path).map_err(|source| JsonStoreError::io(&self.path, source))?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        let tasks: Option<Vec<Task>> =
            serde_json::from_str(&contents).map_err(|source| JsonStoreError::Deserialize {
                path: self.path.clone(),
                source,
            })?;
        Ok(tasks.unwrap_or_default())
    }

    /// Replace the file contents via a synced temporary file and an atomic rename.
    fn write(&self, tasks: &[Task]) -> Result<()> {
        let body = serde_json::to_vec_pretty(tasks).map_err(JsonStoreError::Serialize)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));

        let mut tmp = NamedTempFile::new_in(dir).map_err(|source| JsonStoreError::io(dir, source))?;
        tmp.write_all(&body)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|source| JsonStoreError::io(tmp.path(), source))?;
        tmp.persist(&self.path)
            .map_err(|err| JsonStoreError::io(&self.path, err.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use task_manager_core::TaskStatus;
    use tempfile::TempDir;
    use time::Duration;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft::new(title, "Test Description", TaskStatus::Pending)
    }

    fn open_temp() -> Result<(TempDir, JsonFileStore)> {
        let dir = TempDir::new()?;
        let store = JsonFileStore::open(dir.path())?;
        Ok((dir, store))
    }

    #[test]
    fn open_seeds_missing_file_with_empty_array() -> Result<()> {
        let dir = TempDir::new()?;
        let nested = dir.path().join("Data");
        let store = JsonFileStore::open(&nested)?;

        assert_eq!(store.path(), nested.join(TASKS_FILE));
        assert_eq!(fs::read_to_string(store.path())?.trim(), "[]");
        assert!(store.load_all()?.is_empty());
        Ok(())
    }

    #[test]
    fn open_keeps_existing_file() -> Result<()> {
        let (dir, store) = open_temp()?;
        store.add(draft("Keep me"))?;
        drop(store);

        let reopened = JsonFileStore::open(dir.path())?;
        assert_eq!(reopened.load_all()?.len(), 1);
        Ok(())
    }

    #[test]
    fn add_generates_identity_and_creation_time() -> Result<()> {
        let (_dir, store) = open_temp()?;
        let before = OffsetDateTime::now_utc();
        let task = store.add(draft("Test Task"))?;

        assert_eq!(task.title, "Test Task");
        assert!(task.updated_at.is_none());
        assert!(task.created_at >= before);
        assert!(task.created_at - before < Duration::seconds(5));
        assert_eq!(store.get(task.id)?, Some(task));
        Ok(())
    }

    #[test]
    fn update_overwrites_fields_and_stamps_time() -> Result<()> {
        let (_dir, store) = open_temp()?;
        let mut task = store.add(draft("Original"))?;
        let created_at = task.created_at;

        task.title = "Updated".into();
        task.description = "Updated Desc".into();
        task.status = TaskStatus::Completed;
        task.created_at = created_at - Duration::days(30);

        let updated = store
            .update(&task)?
            .unwrap_or_else(|| panic!("task should exist"));
        assert_eq!(updated.title, "Updated");
        assert_eq!(updated.description, "Updated Desc");
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.created_at, created_at, "creation time is immutable");
        let stamp = updated
            .updated_at
            .unwrap_or_else(|| panic!("update stamp must be set"));
        assert!(stamp >= created_at);

        let again = store
            .update(&updated)?
            .unwrap_or_else(|| panic!("task should exist"));
        assert!(again.updated_at >= Some(stamp));
        Ok(())
    }

    #[test]
    fn update_missing_task_leaves_file_untouched() -> Result<()> {
        let (_dir, store) = open_temp()?;
        store.add(draft("Existing"))?;
        let before = fs::read_to_string(store.path())?;

        let ghost = Task::create(draft("Non-existent"), OffsetDateTime::now_utc());
        assert!(store.update(&ghost)?.is_none());
        assert_eq!(fs::read_to_string(store.path())?, before);
        Ok(())
    }

    #[test]
    fn delete_removes_exactly_one() -> Result<()> {
        let (_dir, store) = open_temp()?;
        let keep = store.add(draft("Keep"))?;
        let gone = store.add(draft("To Delete"))?;

        assert!(store.delete(gone.id)?);
        assert!(!store.delete(gone.id)?);

        let remaining = store.load_all()?;
        assert_eq!(remaining, vec![keep]);
        Ok(())
    }

    #[test]
    fn delete_unknown_id_returns_false() -> Result<()> {
        let (_dir, store) = open_temp()?;
        assert!(!store.delete(TaskId::new())?);
        Ok(())
    }

    #[test]
    fn empty_or_null_file_reads_as_empty() -> Result<()> {
        let (_dir, store) = open_temp()?;
        fs::write(store.path(), "   \n")?;
        assert!(store.load_all()?.is_empty());
        fs::write(store.path(), "null")?;
        assert!(store.load_all()?.is_empty());
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error() -> Result<()> {
        let (_dir, store) = open_temp()?;
        fs::write(store.path(), "{ not json")?;

        let err = match store.load_all() {
            Ok(tasks) => panic!("expected parse failure, got {} tasks", tasks.len()),
            Err(err) => err,
        };
        assert!(matches!(err, JsonStoreError::Deserialize { .. }));
        assert!(store.add(draft("Blocked")).is_err());
        assert_eq!(fs::read_to_string(store.path())?, "{ not json");
        Ok(())
    }

    #[test]
    fn writes_leave_no_temporary_files_behind() -> Result<()> {
        let (dir, store) = open_temp()?;
        for i in 0..3 {
            store.add(draft(&format!("Task {i}")))?;
        }
        let entries: Vec<_> = fs::read_dir(dir.path())?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from(TASKS_FILE)]);
        Ok(())
    }
}
