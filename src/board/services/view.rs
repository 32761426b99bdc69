//! Filtered, column-grouped projection of a board snapshot.

use super::BoardSnapshot;
use crate::board::domain::{BOARD_COLUMNS, Task, TaskFilter, TaskStatus, by_column, filter_tasks};
use chrono::{DateTime, TimeDelta, Utc};

/// A task with its display flags evaluated at projection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCard {
    /// The task as stored.
    pub task: Task,
    /// Due date has passed.
    pub is_overdue: bool,
    /// Due date falls within the due-soon window.
    pub is_due_soon: bool,
}

/// One rendered column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardColumn {
    status: TaskStatus,
    cards: Vec<TaskCard>,
}

impl BoardColumn {
    /// Returns the column identifier.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the column heading.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.status.title()
    }

    /// Returns the visible cards in board order.
    #[must_use]
    pub fn cards(&self) -> &[TaskCard] {
        &self.cards
    }

    /// Returns the number of visible cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Returns whether the column shows no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Board as rendered: filters applied first, then grouped into the fixed
/// columns. The snapshot it was derived from is not modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardView {
    columns: Vec<BoardColumn>,
    total: usize,
    revision: u64,
}

impl BoardView {
    /// Projects `snapshot` through `filter`.
    #[must_use]
    pub fn project(
        snapshot: &BoardSnapshot,
        filter: &TaskFilter,
        now: DateTime<Utc>,
        due_soon_window: TimeDelta,
    ) -> Self {
        let visible = filter_tasks(snapshot.tasks(), filter);
        let columns = BOARD_COLUMNS
            .iter()
            .map(|&status| BoardColumn {
                status,
                cards: by_column(visible.iter().copied(), status)
                    .into_iter()
                    .map(|task| TaskCard {
                        task: task.clone(),
                        is_overdue: task.is_overdue(now),
                        is_due_soon: task.is_due_soon_within(now, due_soon_window),
                    })
                    .collect(),
            })
            .collect();
        Self {
            columns,
            total: snapshot.len(),
            revision: snapshot.revision(),
        }
    }

    /// Returns the columns in board order.
    #[must_use]
    pub fn columns(&self) -> &[BoardColumn] {
        &self.columns
    }

    /// Returns one column.
    #[must_use]
    pub fn column(&self, status: TaskStatus) -> Option<&BoardColumn> {
        self.columns.iter().find(|column| column.status == status)
    }

    /// Returns the number of cards shown across all columns.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.columns.iter().map(BoardColumn::len).sum()
    }

    /// Returns the number of tasks on the board before filtering.
    #[must_use]
    pub const fn total_count(&self) -> usize {
        self.total
    }

    /// Returns the snapshot revision this view was derived from.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }
}
