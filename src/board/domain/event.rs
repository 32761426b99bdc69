//! Change notifications for the task table.
//!
//! The notification service delivers [`RawChangeEvent`] payloads carrying
//! loosely typed JSON rows. They are validated into [`TaskChangeEvent`]
//! before anything touches board state.

use super::{ChangeEventError, Task, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Kind of row mutation reported by the notification service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    /// A row was inserted.
    Insert,
    /// A row was updated.
    Update,
    /// A row was deleted.
    Delete,
}

impl ChangeKind {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl TryFrom<&str> for ChangeKind {
    type Error = ChangeEventError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "INSERT" => Ok(Self::Insert),
            "UPDATE" => Ok(Self::Update),
            "DELETE" => Ok(Self::Delete),
            _ => Err(ChangeEventError::UnknownKind(value.to_owned())),
        }
    }
}

/// Change payload as delivered on the wire.
///
/// `new` holds the row after an insert or update; `old` holds at least the
/// primary key of a deleted row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawChangeEvent {
    /// `INSERT`, `UPDATE`, or `DELETE`.
    #[serde(rename = "eventType")]
    pub event_type: String,
    /// Row after the change, if any.
    #[serde(default)]
    pub new: Option<Value>,
    /// Row before the change, if any.
    #[serde(default)]
    pub old: Option<Value>,
    /// Commit time reported by the notification service.
    #[serde(default)]
    pub commit_timestamp: Option<DateTime<Utc>>,
}

impl RawChangeEvent {
    /// Builds an insert payload for `task`.
    #[must_use]
    pub fn inserted(task: &Task, at: DateTime<Utc>) -> Self {
        Self::with_row(ChangeKind::Insert, Some(task_row(task)), None, at)
    }

    /// Builds an update payload for `task`.
    #[must_use]
    pub fn updated(task: &Task, at: DateTime<Utc>) -> Self {
        Self::with_row(ChangeKind::Update, Some(task_row(task)), None, at)
    }

    /// Builds a delete payload for `task_id`.
    #[must_use]
    pub fn deleted(task_id: TaskId, at: DateTime<Utc>) -> Self {
        Self::with_row(
            ChangeKind::Delete,
            None,
            Some(json!({ "id": task_id.to_string() })),
            at,
        )
    }

    fn with_row(
        kind: ChangeKind,
        new: Option<Value>,
        old: Option<Value>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type: kind.as_str().to_owned(),
            new,
            old,
            commit_timestamp: Some(at),
        }
    }
}

fn task_row(task: &Task) -> Value {
    json!({
        "id": task.id().to_string(),
        "project_id": task.project_id().to_string(),
        "title": task.title(),
        "status": task.status().as_str(),
        "priority": task.priority().as_str(),
        "position": task.position(),
        "updated_at": task.updated_at().to_rfc3339(),
    })
}

/// Validated change notification for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskChangeEvent {
    /// Kind of mutation.
    pub kind: ChangeKind,
    /// Affected task.
    pub task_id: TaskId,
    /// Commit time, when the notification service reports one.
    pub timestamp: Option<DateTime<Utc>>,
}

impl TryFrom<&RawChangeEvent> for TaskChangeEvent {
    type Error = ChangeEventError;

    fn try_from(raw: &RawChangeEvent) -> Result<Self, Self::Error> {
        let kind = ChangeKind::try_from(raw.event_type.as_str())?;
        let row = match kind {
            ChangeKind::Insert | ChangeKind::Update => raw.new.as_ref(),
            ChangeKind::Delete => raw.old.as_ref(),
        };
        let raw_id = row
            .and_then(|value| value.get("id"))
            .and_then(Value::as_str)
            .ok_or(ChangeEventError::MissingTaskId(kind.as_str()))?;
        let task_id = TaskId::parse_str(raw_id)
            .map_err(|_| ChangeEventError::InvalidTaskId(raw_id.to_owned()))?;

        if let Some(status) = row
            .and_then(|value| value.get("status"))
            .and_then(Value::as_str)
        {
            TaskStatus::try_from(status).map_err(|_| ChangeEventError::UnknownStatus {
                task_id: raw_id.to_owned(),
                status: status.to_owned(),
            })?;
        }

        Ok(Self {
            kind,
            task_id,
            timestamp: raw.commit_timestamp,
        })
    }
}
