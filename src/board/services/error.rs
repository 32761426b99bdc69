//! Service-level errors for board operations.

use crate::board::{
    domain::{BoardDomainError, ChangeEventError, TaskId},
    ports::{NotificationError, PersistenceError},
};
use thiserror::Error;

/// Errors surfaced by board services.
#[derive(Debug, Error)]
pub enum BoardServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),

    /// The referenced task no longer exists. Callers treat this as a no-op.
    #[error("task {0} no longer exists")]
    NotFound(TaskId),

    /// The caller lacks workspace access; the view layer redirects.
    #[error("you do not have access to this workspace")]
    Unauthorized,

    /// A write failed at the persistence service. Not retried.
    #[error("could not save changes: {0}")]
    PersistenceFailure(#[source] PersistenceError),

    /// A change notification could not be interpreted.
    #[error("malformed change event: {0}")]
    MalformedEvent(#[from] ChangeEventError),

    /// The change stream could not be opened or closed.
    #[error("change notifications unavailable: {0}")]
    Notifications(#[source] NotificationError),
}

/// Result type for board service operations.
pub type BoardServiceResult<T> = Result<T, BoardServiceError>;

impl BoardServiceError {
    /// Returns whether the error is benign and the operation should be
    /// treated as a no-op.
    #[must_use]
    pub const fn is_benign(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns whether the view layer should redirect away from the board.
    #[must_use]
    pub const fn requires_redirect(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// One-line message for the user-visible layer.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::PersistenceFailure(_) => {
                "Could not save your change. The board has been restored.".to_owned()
            }
            Self::Unauthorized => "You no longer have access to this workspace.".to_owned(),
            Self::NotFound(_) => "This task no longer exists.".to_owned(),
            Self::Domain(err) => err.to_string(),
            Self::MalformedEvent(_) | Self::Notifications(_) => {
                "Live updates are temporarily unavailable.".to_owned()
            }
        }
    }
}

impl From<PersistenceError> for BoardServiceError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound(id) => Self::NotFound(id),
            PersistenceError::Unauthorized => Self::Unauthorized,
            PersistenceError::Failure(_) => Self::PersistenceFailure(err),
        }
    }
}

impl From<NotificationError> for BoardServiceError {
    fn from(err: NotificationError) -> Self {
        match err {
            NotificationError::Unauthorized => Self::Unauthorized,
            NotificationError::Transport(_) => Self::Notifications(err),
        }
    }
}
