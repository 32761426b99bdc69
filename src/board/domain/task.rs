//! Task record and its derived display attributes.

use super::{
    BoardDomainError, NewTask, ParseTaskPriorityError, ParseTaskStatusError, TaskId, TaskUpdate,
};
use crate::workspace::domain::{ProjectId, UserId, UserProfile};
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Width of the due-soon window used by [`Task::is_due_soon`].
pub const DUE_SOON_WINDOW_DAYS: u32 = 3;

/// Board column a task sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    Todo,
    /// Being worked on.
    InProgress,
    /// Awaiting review.
    Review,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// All statuses in board order.
    pub const ALL: [Self; 4] = [Self::Todo, Self::InProgress, Self::Review, Self::Done];

    /// Returns the canonical storage representation, which is also the
    /// column identifier.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Done => "done",
        }
    }

    /// Returns the column heading shown on the board.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Todo => "To Do",
            Self::InProgress => "In Progress",
            Self::Review => "Review",
            Self::Done => "Done",
        }
    }
}

/// Only the exact storage representations are accepted; anything else,
/// including case or whitespace variants, is an unknown status.
impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "review" => Ok(Self::Review),
            "done" => Ok(Self::Done),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority, the default for new tasks.
    #[default]
    Medium,
    /// High priority.
    High,
    /// Urgent priority.
    Urgent,
}

impl TaskPriority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl TryFrom<&str> for TaskPriority {
    type Error = ParseTaskPriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParseTaskPriorityError(value.to_owned())),
        }
    }
}

/// A unit of work on a project board.
///
/// The assignee reference and its resolved profile are kept separately: a
/// task may reference a user whose profile could not be resolved, in which
/// case only `assigned_to` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    project_id: ProjectId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    assigned_to: Option<UserId>,
    assignee: Option<UserProfile>,
    due_date: Option<NaiveDate>,
    position: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Owning project.
    pub project_id: ProjectId,
    /// Task title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Current board column.
    pub status: TaskStatus,
    /// Priority.
    pub priority: TaskPriority,
    /// Assigned user, if any.
    pub assigned_to: Option<UserId>,
    /// Resolved profile of the assigned user, if any.
    pub assignee: Option<UserProfile>,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Ordering key within the project.
    pub position: i32,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task from validated creation fields.
    #[must_use]
    pub fn create(
        project_id: ProjectId,
        fields: &NewTask,
        position: i32,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TaskId::new(),
            project_id,
            title: fields.title().to_owned(),
            description: fields.description().map(str::to_owned),
            status: fields.status(),
            priority: fields.priority(),
            assigned_to: fields.assigned_to(),
            assignee: None,
            due_date: fields.due_date(),
            position,
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstructs a task from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyTaskTitle`] when the stored title is
    /// blank.
    pub fn from_persisted(data: PersistedTaskData) -> Result<Self, BoardDomainError> {
        if data.title.trim().is_empty() {
            return Err(BoardDomainError::EmptyTaskTitle);
        }
        Ok(Self {
            id: data.id,
            project_id: data.project_id,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            assigned_to: data.assigned_to,
            assignee: data.assignee,
            due_date: data.due_date,
            position: data.position,
            created_at: data.created_at,
            updated_at: data.updated_at,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the board column.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the assigned user, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the resolved assignee profile, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<&UserProfile> {
        self.assignee.as_ref()
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the ordering key within the project.
    #[must_use]
    pub const fn position(&self) -> i32 {
        self.position
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns a copy of the task in another column. Every other field,
    /// position included, is retained.
    #[must_use]
    pub fn with_status(&self, status: TaskStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Sets the status and bumps the modification timestamp.
    pub fn set_status(&mut self, status: TaskStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }

    /// Overwrites the editable fields with `update`.
    ///
    /// The resolved assignee profile is cleared when the assignee changes;
    /// the persistence layer re-resolves it on the next read.
    pub fn apply_update(&mut self, update: &TaskUpdate, now: DateTime<Utc>) {
        if self.assigned_to != update.assigned_to() {
            self.assignee = None;
        }
        self.title = update.title().to_owned();
        self.description = update.description().map(str::to_owned);
        self.status = update.status();
        self.priority = update.priority();
        self.assigned_to = update.assigned_to();
        self.due_date = update.due_date();
        self.updated_at = now;
    }

    /// Attaches the resolved profile of the assigned user.
    #[must_use]
    pub fn with_assignee_profile(mut self, profile: Option<UserProfile>) -> Self {
        let assigned_to = self.assigned_to;
        self.assignee = profile.filter(|candidate| Some(candidate.id()) == assigned_to);
        self
    }

    /// Due date as an instant: midnight UTC at the start of the due day.
    fn due_instant(&self) -> Option<DateTime<Utc>> {
        self.due_date
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }

    /// Returns whether the due date has passed.
    #[must_use]
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_instant().is_some_and(|due| due < now)
    }

    /// Returns whether the due date falls before `now` plus the default
    /// due-soon window. Independent of [`Self::is_overdue`]: an overdue task
    /// is also due soon.
    #[must_use]
    pub fn is_due_soon(&self, now: DateTime<Utc>) -> bool {
        self.is_due_soon_within(now, TimeDelta::days(i64::from(DUE_SOON_WINDOW_DAYS)))
    }

    /// Returns whether the due date falls before `now + window`.
    #[must_use]
    pub fn is_due_soon_within(&self, now: DateTime<Utc>, window: TimeDelta) -> bool {
        self.due_instant().is_some_and(|due| {
            now.checked_add_signed(window)
                .is_none_or(|window_end| due < window_end)
        })
    }
}
