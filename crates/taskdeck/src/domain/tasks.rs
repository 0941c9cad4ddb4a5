//! Tasks domain facade.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::entities::{Task, TaskPriority, TaskStatus};
use crate::errors::{TrackerError, TrackerResult};
use crate::storage::Storage;

/// Tasks domain facade providing high-level task operations
pub struct TasksDomain {
    storage: Arc<dyn Storage>,
}

impl TasksDomain {
    /// Create a new tasks domain
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Initialize the project
    pub async fn init(&self) -> TrackerResult<()> {
        self.storage.initialize().await
    }

    /// Check if project is initialized
    pub async fn is_initialized(&self) -> TrackerResult<bool> {
        self.storage.is_initialized().await
    }

    /// List all tasks with optional status filter
    pub async fn list_tasks(&self, status_filter: Option<TaskStatus>) -> TrackerResult<Vec<Task>> {
        let tasks = self.storage.load_tasks().await?;

        if let Some(status) = status_filter {
            Ok(tasks.into_iter().filter(|t| t.status == status).collect())
        } else {
            Ok(tasks)
        }
    }

    /// List all tasks that are not done
    pub async fn open_tasks(&self) -> TrackerResult<Vec<Task>> {
        let tasks = self.storage.load_tasks().await?;
        Ok(tasks.into_iter().filter(Task::is_open).collect())
    }

    /// Get a specific task by ID
    pub async fn get_task(&self, task_id: &str) -> TrackerResult<Task> {
        self.storage
            .load_task(task_id)
            .await?
            .ok_or_else(|| TrackerError::TaskNotFound {
                task_id: task_id.to_string(),
            })
    }

    /// Add a new task with minimal fields
    pub async fn add_task(
        &self,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> TrackerResult<Task> {
        let id = self.storage.next_task_id().await?;
        let task = Task::new(id, title, description);
        self.storage.add_task(task.clone()).await?;
        Ok(task)
    }

    /// Add a task with full details
    pub async fn add_task_full(&self, task: Task) -> TrackerResult<()> {
        self.storage.add_task(task).await
    }

    /// Update task status
    pub async fn set_status(&self, task_id: &str, status: TaskStatus) -> TrackerResult<()> {
        self.storage.update_task_status(task_id, status).await
    }

    /// Update task priority
    pub async fn set_priority(&self, task_id: &str, priority: TaskPriority) -> TrackerResult<()> {
        let mut task = self.get_task(task_id).await?;
        task.priority = priority;
        self.storage.update_task(task_id, &task).await
    }

    /// Update task due date
    pub async fn set_due_date(
        &self,
        task_id: &str,
        due_date: Option<NaiveDate>,
    ) -> TrackerResult<()> {
        let mut task = self.get_task(task_id).await?;
        task.set_due_date(due_date);
        self.storage.update_task(task_id, &task).await
    }

    /// Update task details
    pub async fn update_task(&self, task: &Task) -> TrackerResult<()> {
        self.storage.update_task(&task.id, task).await
    }

    /// Remove a task
    pub async fn remove_task(&self, task_id: &str) -> TrackerResult<()> {
        self.storage.delete_task(task_id).await
    }
}
