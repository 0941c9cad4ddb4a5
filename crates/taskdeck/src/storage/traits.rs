//! Storage trait definitions.

use async_trait::async_trait;

use crate::entities::{Task, TaskStatus};
use crate::errors::TrackerResult;

/// Storage interface for task persistence.
///
/// The intelligence core never talks to storage directly; it operates on
/// in-memory task values. Only the domain facades compose the two.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Initialize storage (create directories, etc.)
    async fn initialize(&self) -> TrackerResult<()>;

    /// Check if storage is initialized
    async fn is_initialized(&self) -> TrackerResult<bool>;

    /// Get storage type identifier
    fn storage_type(&self) -> &'static str;

    /// Load all tasks
    async fn load_tasks(&self) -> TrackerResult<Vec<Task>>;

    /// Load a single task by ID
    async fn load_task(&self, task_id: &str) -> TrackerResult<Option<Task>>;

    /// Save all tasks
    async fn save_tasks(&self, tasks: &[Task]) -> TrackerResult<()>;

    /// Add a new task
    async fn add_task(&self, task: Task) -> TrackerResult<()>;

    /// Update a single task
    async fn update_task(&self, task_id: &str, task: &Task) -> TrackerResult<()>;

    /// Update task status
    async fn update_task_status(&self, task_id: &str, status: TaskStatus) -> TrackerResult<()>;

    /// Delete a task
    async fn delete_task(&self, task_id: &str) -> TrackerResult<()>;

    /// Get next available task ID
    async fn next_task_id(&self) -> TrackerResult<String>;
}
