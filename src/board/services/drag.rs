//! Optimistic status change on drag-and-drop.

use super::{BoardServiceError, BoardServiceResult, BoardSnapshot, BoardStore};
use crate::board::{
    domain::{DragResult, Task, TaskId, TaskStatus},
    ports::TaskPersistence,
};
use std::sync::Arc;

/// What a drag gesture did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Cancelled gesture, or dropped back onto its own slot.
    Ignored,
    /// The task moved to `status` and the write was accepted.
    Moved {
        /// Dragged task.
        task_id: TaskId,
        /// Column the task now sits in.
        status: TaskStatus,
    },
    /// The task was deleted upstream while being dragged; it has been
    /// removed from the board.
    Vanished(TaskId),
}

/// Applies drag results to the store and persists the status change.
///
/// The store is updated before the write is issued. If the write fails and
/// nothing else touched the board meanwhile, the whole pre-drag snapshot is
/// restored. Otherwise only the dragged task is put back, and only if it
/// still holds the optimistic record: changes applied by the reconciler
/// during the write, including remote deletes, are kept.
#[derive(Clone)]
pub struct DragReorderController<P>
where
    P: TaskPersistence,
{
    store: BoardStore,
    persistence: Arc<P>,
}

impl<P> DragReorderController<P>
where
    P: TaskPersistence,
{
    /// Creates a controller writing into `store`.
    #[must_use]
    pub const fn new(store: BoardStore, persistence: Arc<P>) -> Self {
        Self { store, persistence }
    }

    /// Handles the end of a drag gesture.
    ///
    /// Only the task's status changes; its position is kept as is, so
    /// ordering within the destination column is not managed.
    ///
    /// # Errors
    ///
    /// Returns [`BoardServiceError::PersistenceFailure`] or
    /// [`BoardServiceError::Unauthorized`] after rolling the store back.
    /// The write is not retried.
    pub async fn handle_drag_end(&self, drag: &DragResult) -> BoardServiceResult<DragOutcome> {
        let Some(new_status) = drag.target_status() else {
            tracing::debug!(task_id = %drag.task_id, "drag ignored");
            return Ok(DragOutcome::Ignored);
        };

        let Some(task) = self.store.get(drag.task_id) else {
            tracing::debug!(task_id = %drag.task_id, "dragged task is no longer on the board");
            return Ok(DragOutcome::Vanished(drag.task_id));
        };
        let optimistic = task.with_status(new_status);
        let Some((previous, optimistic_revision)) = self.store.stage(optimistic.clone()) else {
            tracing::debug!(task_id = %drag.task_id, "dragged task is no longer on the board");
            return Ok(DragOutcome::Vanished(drag.task_id));
        };

        match self
            .persistence
            .update_task_status(drag.task_id, new_status)
            .await
            .map_err(BoardServiceError::from)
        {
            Ok(()) => Ok(DragOutcome::Moved {
                task_id: drag.task_id,
                status: new_status,
            }),
            Err(BoardServiceError::NotFound(task_id)) => {
                self.store.remove(task_id);
                Ok(DragOutcome::Vanished(task_id))
            }
            Err(err) => {
                self.roll_back(&previous, optimistic_revision, &optimistic);
                tracing::warn!(
                    task_id = %drag.task_id,
                    status = new_status.as_str(),
                    error = %err,
                    "status write failed, board rolled back"
                );
                Err(err)
            }
        }
    }

    fn roll_back(&self, previous: &BoardSnapshot, optimistic_revision: u64, optimistic: &Task) {
        if self.store.restore(previous, optimistic_revision) {
            return;
        }
        let restored = previous
            .get(optimistic.id())
            .is_some_and(|original| {
                original == optimistic
                    || self.store.replace_if_unchanged(optimistic, original.clone())
            });
        if restored {
            tracing::debug!(
                task_id = %optimistic.id(),
                "board changed during the write, rolled back the dragged task only"
            );
        } else {
            tracing::warn!(
                task_id = %optimistic.id(),
                "dragged task changed during the write, keeping the newer record"
            );
        }
    }
}
