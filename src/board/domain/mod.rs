//! Domain model for the task board.
//!
//! Everything here is pure: no I/O, no clocks read implicitly, and no shared
//! state. Derived attributes such as overdue/due-soon take the current
//! instant as an argument.

mod column;
mod drag;
mod error;
mod event;
mod fields;
mod filter;
mod ids;
mod task;

pub use column::{BOARD_COLUMNS, by_column};
pub use drag::{DragLocation, DragResult};
pub use error::{
    BoardDomainError, ChangeEventError, ParseTaskPriorityError, ParseTaskStatusError,
};
pub use event::{ChangeKind, RawChangeEvent, TaskChangeEvent};
pub use fields::{NewTask, TaskUpdate};
pub use filter::{AssigneeFilter, TaskFilter, filter_tasks};
pub use ids::TaskId;
pub use task::{DUE_SOON_WINDOW_DAYS, PersistedTaskData, Task, TaskPriority, TaskStatus};
