//! Persistence port for task reads and writes.

use crate::board::domain::{NewTask, Task, TaskId, TaskStatus, TaskUpdate};
use crate::workspace::domain::ProjectId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for persistence operations.
pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Task persistence contract.
///
/// Implementations enforce row-level authorization for the connected
/// caller: rows are visible only to the workspace owner and members. Every
/// task returned embeds the resolved profile of its assignee.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskPersistence: Send + Sync {
    /// Fetches one task.
    ///
    /// Returns `None` when the task does not exist or is not visible to the
    /// caller.
    async fn get_task(&self, id: TaskId) -> PersistenceResult<Option<Task>>;

    /// Lists a project's tasks ordered by position ascending.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Unauthorized`] when the caller cannot see
    /// the project's workspace.
    async fn list_tasks(&self, project_id: ProjectId) -> PersistenceResult<Vec<Task>>;

    /// Writes a task's status.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] when the task does not exist,
    /// or a failure/authorization error.
    async fn update_task_status(&self, id: TaskId, status: TaskStatus) -> PersistenceResult<()>;

    /// Creates a task in `project_id` and returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Unauthorized`] when the caller cannot
    /// write to the project, or a failure error.
    async fn create_task(&self, project_id: ProjectId, fields: &NewTask)
    -> PersistenceResult<Task>;

    /// Overwrites a task's editable fields.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] when the task does not exist,
    /// or a failure/authorization error.
    async fn update_task(&self, id: TaskId, fields: &TaskUpdate) -> PersistenceResult<()>;

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::NotFound`] when the task does not exist,
    /// or a failure/authorization error.
    async fn delete_task(&self, id: TaskId) -> PersistenceResult<()>;
}

/// Errors returned by persistence implementations.
#[derive(Debug, Clone, Error)]
pub enum PersistenceError {
    /// The task does not exist (or is no longer visible).
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The caller lacks access to the workspace.
    #[error("caller is not authorized for this workspace")]
    Unauthorized,

    /// Network or storage failure.
    #[error("persistence error: {0}")]
    Failure(Arc<dyn std::error::Error + Send + Sync>),
}

impl PersistenceError {
    /// Wraps a network or storage error.
    pub fn failure(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Failure(Arc::new(err))
    }
}
