//! Drag gesture results delivered by the board UI.

use super::{ParseTaskStatusError, TaskId, TaskStatus};

/// A (column, index) slot on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragLocation {
    /// Column the slot belongs to.
    pub column: TaskStatus,
    /// Zero-based index within the rendered column.
    pub index: usize,
}

impl DragLocation {
    /// Creates a location.
    #[must_use]
    pub const fn new(column: TaskStatus, index: usize) -> Self {
        Self { column, index }
    }

    /// Creates a location from a raw column identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ParseTaskStatusError`] when `column_id` is not a board
    /// column.
    pub fn parse(column_id: &str, index: usize) -> Result<Self, ParseTaskStatusError> {
        Ok(Self::new(TaskStatus::try_from(column_id)?, index))
    }
}

/// Result of one drag-and-drop gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragResult {
    /// Dragged task.
    pub task_id: TaskId,
    /// Where the drag started.
    pub source: DragLocation,
    /// Where the task was dropped; `None` when the gesture was cancelled.
    pub destination: Option<DragLocation>,
}

impl DragResult {
    /// Creates a completed drag.
    #[must_use]
    pub const fn dropped(task_id: TaskId, source: DragLocation, destination: DragLocation) -> Self {
        Self {
            task_id,
            source,
            destination: Some(destination),
        }
    }

    /// Creates a cancelled drag.
    #[must_use]
    pub const fn cancelled(task_id: TaskId, source: DragLocation) -> Self {
        Self {
            task_id,
            source,
            destination: None,
        }
    }

    /// Returns the column the task should move to, or `None` when the
    /// gesture was cancelled or dropped back on its own slot.
    ///
    /// Only the column matters: the destination index is not turned into a
    /// new position.
    #[must_use]
    pub fn target_status(&self) -> Option<TaskStatus> {
        self.destination
            .filter(|destination| *destination != self.source)
            .map(|destination| destination.column)
    }
}
