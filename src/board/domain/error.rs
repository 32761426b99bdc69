//! Error types for board domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing board domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,

    /// The status value is not one of the four board columns.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),

    /// The priority value is not a known priority.
    #[error(transparent)]
    InvalidPriority(#[from] ParseTaskPriorityError),

    /// The assignee filter value is neither `unassigned` nor a user id.
    #[error("invalid assignee filter '{0}'")]
    InvalidAssigneeFilter(String),
}

/// Error returned while parsing task statuses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);

/// Reasons a change notification cannot be applied.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChangeEventError {
    /// The event type is not insert, update, or delete.
    #[error("unknown change event type '{0}'")]
    UnknownKind(String),

    /// The event row carries no task identifier.
    #[error("{0} event is missing a task id")]
    MissingTaskId(&'static str),

    /// The event row carries an identifier that is not a UUID.
    #[error("invalid task id '{0}'")]
    InvalidTaskId(String),

    /// The event row carries a status outside the four board columns.
    #[error("task {task_id} has unrecognized status '{status}'")]
    UnknownStatus {
        /// Raw task identifier from the event row.
        task_id: String,
        /// Raw status value from the event row.
        status: String,
    },
}
