//! Local create, edit, and delete of tasks.

use super::{BoardServiceError, BoardServiceResult, BoardStore};
use crate::board::{
    domain::{NewTask, Task, TaskId, TaskUpdate},
    ports::TaskPersistence,
};
use crate::workspace::domain::ProjectId;
use std::sync::Arc;

/// Writes task edits through persistence, then mirrors them into the
/// store. Unlike drags these writes are not optimistic.
#[derive(Clone)]
pub struct TaskEditService<P>
where
    P: TaskPersistence,
{
    store: BoardStore,
    persistence: Arc<P>,
    project_id: ProjectId,
}

impl<P> TaskEditService<P>
where
    P: TaskPersistence,
{
    /// Creates an edit service for the board of `project_id`.
    #[must_use]
    pub const fn new(store: BoardStore, persistence: Arc<P>, project_id: ProjectId) -> Self {
        Self {
            store,
            persistence,
            project_id,
        }
    }

    /// Creates a task and adds it to the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError`] when persistence rejects the write.
    pub async fn create_task(&self, fields: &NewTask) -> BoardServiceResult<Task> {
        let created = self
            .persistence
            .create_task(self.project_id, fields)
            .await?;
        self.store.insert(created.clone());
        tracing::debug!(task_id = %created.id(), "task created");
        Ok(created)
    }

    /// Overwrites a task's editable fields and replaces the stored record
    /// with the re-read task.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::NotFound`] when the task is gone (it is
    /// removed from the board), or other persistence errors.
    pub async fn update_task(&self, id: TaskId, fields: &TaskUpdate) -> BoardServiceResult<Task> {
        if let Err(err) = self.persistence.update_task(id, fields).await {
            let service_err = BoardServiceError::from(err);
            if service_err.is_benign() {
                self.store.remove(id);
            }
            return Err(service_err);
        }
        let Some(updated) = self.persistence.get_task(id).await? else {
            self.store.remove(id);
            return Err(BoardServiceError::NotFound(id));
        };
        self.store.replace(updated.clone());
        Ok(updated)
    }

    /// Deletes a task and removes it from the board. Deleting a task that
    /// is already gone succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError`] for failures other than a missing task.
    pub async fn delete_task(&self, id: TaskId) -> BoardServiceResult<()> {
        match self.persistence.delete_task(id).await.map_err(BoardServiceError::from) {
            Ok(()) => {}
            Err(err) if err.is_benign() => {
                tracing::debug!(task_id = %id, "task already deleted");
            }
            Err(err) => return Err(err),
        }
        self.store.remove(id);
        Ok(())
    }
}
