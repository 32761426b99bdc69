//! Search and filter criteria applied to a task set.

use super::{BoardDomainError, Task, TaskPriority, TaskStatus};
use crate::workspace::domain::UserId;

/// Assignee criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssigneeFilter {
    /// Matches tasks without an assignee.
    Unassigned,
    /// Matches tasks assigned to this member.
    Member(UserId),
}

impl AssigneeFilter {
    /// Sentinel value used by filter selectors for "no assignee".
    pub const UNASSIGNED: &'static str = "unassigned";

    /// Returns whether `task` satisfies this criterion.
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::Unassigned => task.assigned_to().is_none(),
            Self::Member(user_id) => task.assigned_to() == Some(user_id),
        }
    }
}

impl TryFrom<&str> for AssigneeFilter {
    type Error = BoardDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let trimmed = value.trim();
        if trimmed.eq_ignore_ascii_case(Self::UNASSIGNED) {
            return Ok(Self::Unassigned);
        }
        uuid::Uuid::parse_str(trimmed)
            .map(|uuid| Self::Member(UserId::from_uuid(uuid)))
            .map_err(|_| BoardDomainError::InvalidAssigneeFilter(value.to_owned()))
    }
}

/// Ephemeral board view state: search text plus optional selectors.
///
/// Every criterion left unset matches all tasks; set criteria combine with
/// logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    search: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    assignee: Option<AssigneeFilter>,
}

impl TaskFilter {
    /// Creates a filter that matches every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the search text. An empty string clears the search.
    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.set_search(search);
        self
    }

    /// Restricts to one status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts to one priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Restricts by assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: AssigneeFilter) -> Self {
        self.assignee = Some(assignee);
        self
    }

    /// Replaces the search text. An empty string clears the search.
    pub fn set_search(&mut self, search: impl Into<String>) {
        let text = search.into();
        self.search = (!text.is_empty()).then_some(text);
    }

    /// Replaces the status selector.
    pub const fn set_status(&mut self, status: Option<TaskStatus>) {
        self.status = status;
    }

    /// Replaces the priority selector.
    pub const fn set_priority(&mut self, priority: Option<TaskPriority>) {
        self.priority = priority;
    }

    /// Replaces the assignee selector.
    pub const fn set_assignee(&mut self, assignee: Option<AssigneeFilter>) {
        self.assignee = assignee;
    }

    /// Returns the search text, if any.
    #[must_use]
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Returns the status selector.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the priority selector.
    #[must_use]
    pub const fn priority(&self) -> Option<TaskPriority> {
        self.priority
    }

    /// Returns the assignee selector.
    #[must_use]
    pub const fn assignee(&self) -> Option<AssigneeFilter> {
        self.assignee
    }

    /// Returns whether any selector (not the search text) is set.
    #[must_use]
    pub const fn has_active_filters(&self) -> bool {
        self.status.is_some() || self.priority.is_some() || self.assignee.is_some()
    }

    /// Clears the status, priority, and assignee selectors. The search text
    /// is kept.
    pub const fn clear_filters(&mut self) {
        self.status = None;
        self.priority = None;
        self.assignee = None;
    }

    /// Returns whether `task` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_search(task)
            && self.status.is_none_or(|status| task.status() == status)
            && self.priority.is_none_or(|priority| task.priority() == priority)
            && self.assignee.is_none_or(|assignee| assignee.matches(task))
    }

    /// Case-insensitive substring match on title or description. An absent
    /// description simply does not match.
    fn matches_search(&self, task: &Task) -> bool {
        let Some(search) = self.search.as_deref() else {
            return true;
        };
        let needle = search.to_lowercase();
        task.title().to_lowercase().contains(&needle)
            || task
                .description()
                .is_some_and(|description| description.to_lowercase().contains(&needle))
    }
}

/// Reduces `tasks` to those matching `criteria`, preserving input order.
///
/// Pure: the input collection is only read.
pub fn filter_tasks<'a, I>(tasks: I, criteria: &TaskFilter) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    tasks
        .into_iter()
        .filter(|task| criteria.matches(task))
        .collect()
}
