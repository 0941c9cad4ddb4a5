//! File-based storage implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;

use super::traits::Storage;
use crate::entities::{Task, TaskStatus};
use crate::errors::{TrackerError, TrackerResult};

/// On-disk document layout
#[derive(Debug, Default, Serialize, Deserialize)]
struct TaskDocument {
    #[serde(default)]
    tasks: Vec<Task>,
}

/// File-based storage implementation
pub struct FileStorage {
    /// Project root path
    root: PathBuf,

    /// Path to the data directory (`.taskdeck/`)
    data_dir: PathBuf,

    /// Path to tasks.json
    tasks_file: PathBuf,
}

impl FileStorage {
    /// Create a new file storage instance
    ///
    /// Uses a `.taskdeck/` directory under the given root.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let data_dir = root.join(".taskdeck");
        let tasks_file = data_dir.join("tasks.json");

        Self {
            root,
            data_dir,
            tasks_file,
        }
    }

    /// Get the project root path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read and parse the tasks file
    async fn read_document(&self) -> TrackerResult<TaskDocument> {
        match fs::read_to_string(&self.tasks_file).await {
            Ok(content) => {
                let document: TaskDocument = serde_json::from_str(&content)?;
                Ok(document)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TaskDocument::default()),
            Err(e) => Err(TrackerError::FileReadError {
                path: self.tasks_file.display().to_string(),
                reason: e.to_string(),
            }),
        }
    }

    /// Write the tasks file
    async fn write_document(&self, document: &TaskDocument) -> TrackerResult<()> {
        if let Some(parent) = self.tasks_file.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(document)?;
        fs::write(&self.tasks_file, content)
            .await
            .map_err(|e| TrackerError::FileWriteError {
                path: self.tasks_file.display().to_string(),
                reason: e.to_string(),
            })
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> TrackerResult<()> {
        fs::create_dir_all(&self.data_dir).await?;
        if fs::metadata(&self.tasks_file).await.is_err() {
            self.write_document(&TaskDocument::default()).await?;
        }
        Ok(())
    }

    async fn is_initialized(&self) -> TrackerResult<bool> {
        Ok(fs::metadata(&self.tasks_file).await.is_ok())
    }

    fn storage_type(&self) -> &'static str {
        "file"
    }

    async fn load_tasks(&self) -> TrackerResult<Vec<Task>> {
        Ok(self.read_document().await?.tasks)
    }

    async fn load_task(&self, task_id: &str) -> TrackerResult<Option<Task>> {
        let document = self.read_document().await?;
        Ok(document.tasks.into_iter().find(|t| t.id == task_id))
    }

    async fn save_tasks(&self, tasks: &[Task]) -> TrackerResult<()> {
        self.write_document(&TaskDocument {
            tasks: tasks.to_vec(),
        })
        .await
    }

    async fn add_task(&self, task: Task) -> TrackerResult<()> {
        let mut document = self.read_document().await?;
        document.tasks.push(task);
        self.write_document(&document).await
    }

    async fn update_task(&self, task_id: &str, task: &Task) -> TrackerResult<()> {
        let mut document = self.read_document().await?;
        let slot = document
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| TrackerError::TaskNotFound {
                task_id: task_id.to_string(),
            })?;
        *slot = task.clone();
        self.write_document(&document).await
    }

    async fn update_task_status(&self, task_id: &str, status: TaskStatus) -> TrackerResult<()> {
        let mut document = self.read_document().await?;
        let task = document
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or_else(|| TrackerError::TaskNotFound {
                task_id: task_id.to_string(),
            })?;
        task.set_status(status);
        self.write_document(&document).await
    }

    async fn delete_task(&self, task_id: &str) -> TrackerResult<()> {
        let mut document = self.read_document().await?;
        let before = document.tasks.len();
        document.tasks.retain(|t| t.id != task_id);
        if document.tasks.len() == before {
            return Err(TrackerError::TaskNotFound {
                task_id: task_id.to_string(),
            });
        }
        self.write_document(&document).await
    }

    async fn next_task_id(&self) -> TrackerResult<String> {
        let document = self.read_document().await?;
        let max_id = document
            .tasks
            .iter()
            .filter_map(|t| t.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Ok((max_id + 1).to_string())
    }
}
