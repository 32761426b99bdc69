//! Board session configuration.

use crate::board::domain::DUE_SOON_WINDOW_DAYS;
use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

/// Tunables for an open board session.
///
/// # Examples
///
/// ```
/// use mondrian::board::{domain::DUE_SOON_WINDOW_DAYS, services::BoardConfig};
///
/// let config = BoardConfig::default();
/// assert_eq!(config.due_soon_days, DUE_SOON_WINDOW_DAYS);
///
/// let tight = BoardConfig::default().with_max_in_flight_fetches(1);
/// assert_eq!(tight.max_in_flight_fetches, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Width of the due-soon window in days.
    pub due_soon_days: u32,
    /// Maximum number of task fetches the reconciler runs concurrently.
    /// Further events wait in the subscription queue.
    pub max_in_flight_fetches: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            due_soon_days: DUE_SOON_WINDOW_DAYS,
            max_in_flight_fetches: 16,
        }
    }
}

impl BoardConfig {
    /// Sets the due-soon window.
    #[must_use]
    pub const fn with_due_soon_days(mut self, days: u32) -> Self {
        self.due_soon_days = days;
        self
    }

    /// Sets the reconciler fetch concurrency. Zero is treated as one.
    #[must_use]
    pub const fn with_max_in_flight_fetches(mut self, limit: usize) -> Self {
        self.max_in_flight_fetches = limit;
        self
    }

    /// Returns the due-soon window as a duration.
    #[must_use]
    pub fn due_soon_window(&self) -> TimeDelta {
        TimeDelta::try_days(i64::from(self.due_soon_days))
            .unwrap_or_else(|| TimeDelta::days(i64::from(DUE_SOON_WINDOW_DAYS)))
    }
}
