//! Change-notification port.

use crate::board::domain::RawChangeEvent;
use crate::workspace::domain::ProjectId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Result type for notification operations.
pub type NotificationResult<T> = Result<T, NotificationError>;

/// Identifier of one open subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    /// Creates a new random subscription identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ordered stream of task-table changes for one project.
///
/// Delivery is at-least-once: the same change may be seen more than once.
#[derive(Debug)]
pub struct ChangeSubscription {
    id: SubscriptionId,
    project_id: ProjectId,
    events: mpsc::UnboundedReceiver<RawChangeEvent>,
}

impl ChangeSubscription {
    /// Wraps the receiving end of a change stream.
    #[must_use]
    pub const fn new(
        id: SubscriptionId,
        project_id: ProjectId,
        events: mpsc::UnboundedReceiver<RawChangeEvent>,
    ) -> Self {
        Self {
            id,
            project_id,
            events,
        }
    }

    /// Returns the subscription identifier.
    #[must_use]
    pub const fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Returns the project the stream is scoped to.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Waits for the next change. Returns `None` once the stream is closed.
    pub async fn next_event(&mut self) -> Option<RawChangeEvent> {
        self.events.recv().await
    }
}

/// Change-notification contract.
#[async_trait]
pub trait ChangeNotifications: Send + Sync {
    /// Opens a change stream for a project's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`NotificationError::Unauthorized`] when the caller cannot
    /// see the project, or a transport error.
    async fn subscribe(&self, project_id: ProjectId) -> NotificationResult<ChangeSubscription>;

    /// Stops delivery for a subscription. Unknown identifiers are ignored.
    ///
    /// # Errors
    ///
    /// Returns a transport error when the service cannot be reached.
    async fn unsubscribe(&self, subscription_id: SubscriptionId) -> NotificationResult<()>;
}

/// Errors returned by notification implementations.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    /// The caller lacks access to the project's workspace.
    #[error("caller is not authorized to subscribe to this project")]
    Unauthorized,

    /// The notification service could not be reached.
    #[error("notification transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl NotificationError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
