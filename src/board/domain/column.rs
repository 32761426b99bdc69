//! Fixed board columns and per-column projection.

use super::{Task, TaskStatus};

/// Column identifiers in rendering order, which is also the canonical
/// progression of work.
pub const BOARD_COLUMNS: [TaskStatus; 4] = TaskStatus::ALL;

/// Selects the tasks in `column`, preserving input order.
///
/// Apply this to the output of [`super::filter_tasks`]: filters run before
/// columns.
pub fn by_column<'a, I>(tasks: I, column: TaskStatus) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .filter(|task| task.status() == column)
        .collect()
}
