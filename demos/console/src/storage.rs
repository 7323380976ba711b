//! JSON-file persistence for the demo.
//!
//! Every write rewrites the whole file, which is fine at todo-list scale
//! and keeps the file human-inspectable between runs.

use std::fs;
use std::path::PathBuf;
use taskwire_core::storage::{StorageError, TaskStorage};
use taskwire_core::task::{TaskData, TaskId};

/// [`TaskStorage`] backed by one pretty-printed JSON file.
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Storage over the given file. The file may not exist yet; it is
    /// created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> Result<Vec<TaskData>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path)
            .map_err(|error| StorageError::LoadFailed(error.to_string()))?;
        serde_json::from_str(&raw).map_err(|error| StorageError::Corrupt(error.to_string()))
    }

    fn write(&self, tasks: &[TaskData]) -> Result<(), StorageError> {
        let raw = serde_json::to_string_pretty(tasks)
            .map_err(|error| StorageError::Unavailable(error.to_string()))?;
        fs::write(&self.path, raw).map_err(|error| StorageError::Unavailable(error.to_string()))
    }
}

impl TaskStorage for JsonFileStorage {
    fn load_all(&self) -> Result<Vec<TaskData>, StorageError> {
        self.read()
    }

    fn put(&self, task: &TaskData) -> Result<(), StorageError> {
        let mut tasks = self.read()?;
        match tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(existing) => *existing = task.clone(),
            None => tasks.push(task.clone()),
        }
        self.write(&tasks).map_err(|error| StorageError::WriteFailed {
            id: task.id,
            reason: error.to_string(),
        })
    }

    fn delete(&self, id: TaskId) -> Result<(), StorageError> {
        let mut tasks = self.read()?;
        tasks.retain(|existing| existing.id != id);
        self.write(&tasks).map_err(|error| StorageError::DeleteFailed {
            id,
            reason: error.to_string(),
        })
    }

    fn save_all(&self, tasks: &[TaskData]) -> Result<(), StorageError> {
        self.write(tasks)
    }
}
