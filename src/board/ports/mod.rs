//! Port contracts for the board engine.
//!
//! Ports define infrastructure-agnostic interfaces for the persistence
//! service and the change-notification service.

pub mod notifications;
pub mod persistence;

pub use notifications::{
    ChangeNotifications, ChangeSubscription, NotificationError, NotificationResult,
    SubscriptionId,
};
pub use persistence::{PersistenceError, PersistenceResult, TaskPersistence};

#[cfg(test)]
pub use persistence::MockTaskPersistence;
